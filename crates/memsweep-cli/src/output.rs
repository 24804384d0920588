use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

/// Left-aligned columns separated by two spaces, with a dashed rule under the
/// header. Cells beyond the header count are dropped.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:w$}"))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(headers.to_vec());
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&line(rule.iter().map(String::as_str).collect()));
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_to_widest_cell() {
        let rows = vec![
            vec!["stale".to_string(), "session-context/old.xml".to_string()],
            vec!["active".to_string(), "a.xml".to_string()],
        ];
        let text = render_table(&["STATE", "PATH"], &rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "STATE   PATH");
        assert_eq!(lines[1], "------  -----------------------");
        assert_eq!(lines[2], "stale   session-context/old.xml");
        assert_eq!(lines[3], "active  a.xml");
    }
}
