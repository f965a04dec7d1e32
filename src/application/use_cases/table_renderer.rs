use crate::domain::registry::{PartnerRecord, COMPANY_HEADER, PARTNER_HEADER};

const COLUMN_GAP: &str = "  ";

/// Render partner rows as a fixed-width text table.
///
/// The first column is the source row index (left-aligned, no header); the
/// company and partner columns are right-aligned to their widest cell.
pub fn render_table(rows: &[PartnerRecord]) -> String {
    if rows.is_empty() {
        return "Empty table".to_string();
    }

    let index_labels: Vec<String> = rows.iter().map(|row| row.index.to_string()).collect();
    let index_width = width_of(index_labels.iter().map(String::as_str), "");
    let company_width = width_of(rows.iter().map(|row| row.company_id.as_str()), COMPANY_HEADER);
    let partner_width = width_of(rows.iter().map(PartnerRecord::display_name), PARTNER_HEADER);

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format!(
        "{:<iw$}{gap}{:>cw$}{gap}{:>pw$}",
        "",
        COMPANY_HEADER,
        PARTNER_HEADER,
        gap = COLUMN_GAP,
        iw = index_width,
        cw = company_width,
        pw = partner_width,
    ));

    for (label, row) in index_labels.iter().zip(rows) {
        lines.push(format!(
            "{:<iw$}{gap}{:>cw$}{gap}{:>pw$}",
            label,
            row.company_id,
            row.display_name(),
            gap = COLUMN_GAP,
            iw = index_width,
            cw = company_width,
            pw = partner_width,
        ));
    }

    lines.join("\n")
}

fn width_of<'a>(cells: impl Iterator<Item = &'a str>, header: &str) -> usize {
    cells
        .map(|cell| cell.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
}
