/// Collapses all runs of whitespace (including newlines) into single spaces
/// and trims both ends
///
/// Scraped field text often carries template indentation and line breaks;
/// a record must fit on one snapshot line.
pub fn clean_field(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether a field value needs quoting in a delimited line
pub fn needs_quoting(field: &str, delimiter: char) -> bool {
    field.contains(delimiter) || field.contains(['"', '\r', '\n'])
}
