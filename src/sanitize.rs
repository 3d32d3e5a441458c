/// Drops rows the spreadsheet exports as nothing but delimiters (`,,,,,`).
pub fn strip_blank_rows(text: &str) -> String {
    text.split('\n')
        .filter(|line| !is_only_commas(line.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_only_commas(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c == ',')
}
