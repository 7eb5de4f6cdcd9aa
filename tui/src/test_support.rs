use ratatui::buffer::Buffer;

/// Plain-text rows of `buf`, trailing blanks trimmed, one line per row.
pub(crate) fn buffer_to_plain_text(buf: &Buffer) -> String {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
