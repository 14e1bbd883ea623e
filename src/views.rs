//! Server-rendered HTML pages.
//!
//! Every value that came from a form is passed through [`escape`] before it
//! is written into markup.

use crate::model::{FuelLog, Maintenance, Vehicle};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn opt(value: &Option<String>) -> String {
    value.as_deref().map(escape).unwrap_or_default()
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Vehicle Logbook</title>
</head>
<body>
<nav><a href="/">Home</a> | <a href="/vehicles">Vehicles</a> | <a href="/add_vehicle">Add vehicle</a> | <a href="/add_service">Add service</a></nav>
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn index() -> String {
    layout(
        "Vehicle Logbook",
        r#"<p>Track fuel fill-ups and maintenance for your vehicles.</p>
<ul>
<li><a href="/vehicles">View vehicles</a></li>
<li><a href="/add_vehicle">Register a vehicle</a></li>
<li><a href="/add_service">Record a service</a></li>
</ul>"#,
    )
}

pub fn vehicles(vehicles: &[Vehicle]) -> String {
    if vehicles.is_empty() {
        return layout(
            "Vehicles",
            r#"<p>No vehicles yet. <a href="/add_vehicle">Add one</a>.</p>"#,
        );
    }

    let mut rows = String::new();
    for v in vehicles {
        rows.push_str(&format!(
            r#"<tr><td>{make}</td><td>{model}</td><td>{year}</td><td>{nickname}</td><td>{notes}</td><td><a href="/vehicles/{id}/maintenance_logs">Maintenance</a> <a href="/vehicles/{id}/fuel">Fuel</a></td></tr>
"#,
            id = v.id,
            make = escape(&v.make),
            model = escape(&v.model),
            year = v.year,
            nickname = opt(&v.nickname),
            notes = opt(&v.notes),
        ));
    }

    layout(
        "Vehicles",
        &format!(
            r#"<table>
<thead><tr><th>Make</th><th>Model</th><th>Year</th><th>Nickname</th><th>Notes</th><th></th></tr></thead>
<tbody>
{rows}</tbody>
</table>"#
        ),
    )
}

pub fn add_vehicle_form() -> String {
    layout(
        "Add vehicle",
        r#"<form method="post" action="/add_vehicle">
<label>Make <input name="make" required maxlength="50"></label>
<label>Model <input name="model" required maxlength="50"></label>
<label>Year <input name="year" type="number" required></label>
<label>Nickname <input name="nickname" maxlength="50"></label>
<label>Notes <textarea name="notes"></textarea></label>
<button type="submit">Save</button>
</form>"#,
    )
}

pub fn maintenance_logs(vehicle: &Vehicle, entries: &[Maintenance], notice: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(notice) = notice {
        body.push_str(&format!("<p class=\"notice\">{}</p>\n", escape(notice)));
    }
    body.push_str(&format!(
        "<p><a href=\"/add_service?vehicle_id={}\">Record a service</a></p>\n",
        vehicle.id
    ));

    if entries.is_empty() {
        body.push_str("<p>No maintenance recorded.</p>");
    } else {
        body.push_str(
            "<table>\n<thead><tr><th>Date</th><th>Odometer</th><th>Service</th><th>Cost</th><th>Notes</th><th></th></tr></thead>\n<tbody>\n",
        );
        for m in entries {
            body.push_str(&format!(
                "<tr><td>{date}</td><td>{odometer}</td><td>{service}</td><td>{cost:.2}</td><td>{notes}</td><td><form method=\"post\" action=\"/maintenance/{id}/delete\"><button type=\"submit\">Delete</button></form></td></tr>\n",
                id = m.id,
                date = m.date,
                odometer = m.odometer,
                service = escape(&m.service_type),
                cost = m.cost,
                notes = opt(&m.notes),
            ));
        }
        body.push_str("</tbody>\n</table>");
    }

    layout(
        &format!("Maintenance: {}", vehicle.display_name()),
        &body,
    )
}

pub fn add_service_form(vehicles: &[Vehicle], selected: Option<i64>) -> String {
    if vehicles.is_empty() {
        return layout(
            "Add service",
            r#"<p>Register a vehicle before recording a service. <a href="/add_vehicle">Add vehicle</a></p>"#,
        );
    }

    let mut options = String::new();
    for v in vehicles {
        let marker = if Some(v.id) == selected { " selected" } else { "" };
        options.push_str(&format!(
            "<option value=\"{}\"{marker}>{}</option>\n",
            v.id,
            escape(&v.display_name()),
        ));
    }

    layout(
        "Add service",
        &format!(
            r#"<form method="post" action="/add_service">
<label>Vehicle <select name="vehicle_id" required>
{options}</select></label>
<label>Date <input name="date" type="date" required></label>
<label>Odometer <input name="odometer" type="number" required></label>
<label>Service type <input name="service_type" required maxlength="100"></label>
<label>Cost <input name="cost" type="number" step="0.01" required></label>
<label>Notes <textarea name="notes"></textarea></label>
<button type="submit">Save</button>
</form>"#
        ),
    )
}

pub fn fuel_logs(vehicle: &Vehicle, logs: &[FuelLog]) -> String {
    let mut body = format!(
        "<p><a href=\"/vehicles/{}/fuel/add\">Add fill-up</a></p>\n",
        vehicle.id
    );

    if logs.is_empty() {
        body.push_str("<p>No fill-ups recorded.</p>");
    } else {
        body.push_str(
            "<table>\n<thead><tr><th>Date</th><th>Odometer</th><th>Liters</th><th>Price/L</th><th>Total</th><th>Full tank</th><th>Notes</th></tr></thead>\n<tbody>\n",
        );
        for f in logs {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.3}</td><td>{:.2}</td><td>{}</td><td>{}</td></tr>\n",
                f.date,
                f.odometer,
                f.liters,
                f.price_per_liter,
                f.total_cost,
                if f.full_tank { "Yes" } else { "No" },
                opt(&f.notes),
            ));
        }
        body.push_str("</tbody>\n</table>");
    }

    layout(&format!("Fuel: {}", vehicle.display_name()), &body)
}

pub fn add_fuel_form(vehicle: &Vehicle) -> String {
    layout(
        &format!("Add fill-up: {}", vehicle.display_name()),
        &format!(
            r#"<form method="post" action="/vehicles/{id}/fuel/add">
<label>Date <input name="date" type="date" required></label>
<label>Odometer <input name="odometer" type="number" required></label>
<label>Liters <input name="liters" type="number" step="0.01" required></label>
<label>Price per liter <input name="price_per_liter" type="number" step="0.001" required></label>
<label>Total cost <input name="total_cost" type="number" step="0.01" placeholder="liters x price"></label>
<label><input name="full_tank" type="checkbox"> Full tank</label>
<label>Notes <textarea name="notes"></textarea></label>
<button type="submit">Save</button>
</form>"#,
            id = vehicle.id,
        ),
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn vehicle() -> Vehicle {
        Vehicle {
            id: 4,
            make: "Ford".to_string(),
            model: "F-150".to_string(),
            year: 2015,
            nickname: Some("<b>Big Blue</b>".to_string()),
            notes: None,
        }
    }

    #[test]
    fn escape_replaces_markup() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn vehicle_list_escapes_user_text() {
        let page = vehicles(&[vehicle()]);
        assert!(page.contains("&lt;b&gt;Big Blue&lt;/b&gt;"));
        assert!(!page.contains("<b>Big Blue</b>"));
        assert!(page.contains(r#"href="/vehicles/4/fuel""#));
    }

    #[test]
    fn maintenance_page_shows_notice_and_delete_forms() {
        let entry = Maintenance {
            id: 9,
            vehicle_id: 4,
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            odometer: 88000,
            service_type: "Brake pads".to_string(),
            cost: 240.0,
            notes: None,
        };
        let page = maintenance_logs(&vehicle(), &[entry], Some("Deleted."));
        assert!(page.contains(r#"<p class="notice">Deleted.</p>"#));
        assert!(page.contains(r#"action="/maintenance/9/delete""#));
        assert!(page.contains("<td>2024-05-02</td>"));
        assert!(page.contains("<td>240.00</td>"));
    }

    #[test]
    fn service_form_preselects_vehicle() {
        let page = add_service_form(&[vehicle()], Some(4));
        assert!(page.contains(r#"<option value="4" selected>"#));
        assert!(add_service_form(&[], None).contains("Register a vehicle"));
    }
}
