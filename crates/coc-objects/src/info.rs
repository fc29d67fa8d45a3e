//! Builder information panel.

use std::fmt::Write;

use crate::object::GameObject;

const PANEL_WIDTH: usize = 80;
const INDENT: &str = "                    ";

/// Render the panel shown to builders by the `info` command.
pub fn render(obj: &GameObject) -> String {
    let mut out = String::new();

    let mut header = format!("--- {} ", obj.name());
    while header.chars().count() < PANEL_WIDTH {
        header.push('-');
    }
    out.push_str(&header);
    out.push('\n');

    // Writing to a String cannot fail.
    let _ = writeln!(out, "* Visible on Room:  {}", obj.is_visible());
    let _ = writeln!(out, "* Mass:             {}", obj.mass().mass());
    let _ = writeln!(out, "* Actual Gravity:   {}", obj.mass().gravity());

    match obj.parts() {
        Some(parts) => {
            let _ = writeln!(out, "* Parts:            {}", parts.parts_amount());
            for part in parts.iter() {
                let _ = writeln!(out, "{}{}", INDENT, part.name());
            }
        }
        None => {
            let _ = writeln!(out, "* Parts:            0");
        }
    }

    let seats = obj.seats().map_or(0, |s| s.seats());
    let _ = writeln!(out, "* Seats:            {}", seats);

    let slots = obj.slots().map_or(0, |s| s.slot_count());
    let _ = writeln!(out, "* Slots:            {}", slots);

    if let Some(c) = obj.container().filter(|c| c.is_container()) {
        let state = match (c.is_open(), c.is_locked()) {
            (true, _) => "open",
            (false, true) => "locked",
            (false, false) => "closed",
        };
        let _ = writeln!(
            out,
            "* Container:        {}/{} ({})",
            c.contents().len(),
            c.max_capacity(),
            state
        );
    }

    if let Some(s) = obj.stack() {
        let _ = writeln!(out, "* Stack:            {}/{}", s.actual_stack(), s.max_stack());
    }

    let footer_rule = "-".repeat(PANEL_WIDTH - 19);
    let _ = writeln!(out, "{} {} ---", footer_rule, obj.guid());
    out
}

#[cfg(test)]
mod tests {
    use crate::blueprint;
    use crate::object::GameObject;
    use crate::reference::ObjectId;

    #[test]
    fn chair_panel() {
        let chair =
            GameObject::from_blueprint(ObjectId(1), "Old chair", &blueprint::chair(), 1.0).unwrap();
        let info = chair.info();
        let lines: Vec<&str> = info.lines().collect();

        assert_eq!(lines[0].len(), 80);
        assert!(lines[0].starts_with("--- Old chair ---"));
        assert_eq!(lines[1], "* Visible on Room:  true");
        assert_eq!(lines[2], "* Mass:             3028.8");
        assert_eq!(lines[3], "* Actual Gravity:   1");
        assert_eq!(lines[4], "* Parts:            4");
        assert_eq!(lines[5].trim(), "Old chair body");
        assert!(info.contains("* Seats:            1\n"));
        assert!(lines.last().unwrap().ends_with(" FNT-CHR-000001 ---"));
        assert!(!info.contains("* Container"));
    }

    #[test]
    fn chest_panel_shows_lock_state() {
        let mut chest = GameObject::from_blueprint(
            ObjectId(2),
            "sea chest",
            &blueprint::sea_chest(),
            1.0,
        )
        .unwrap();
        chest.container_mut().unwrap().lock("brass key").unwrap();
        assert!(chest.info().contains("* Container:        0/20 (locked)"));
    }
}
