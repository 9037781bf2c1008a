use std::ops::RangeInclusive;

/// Parses an inclusive id range such as `1-151`. A single id (`25`) is a
/// range of one.
pub fn parse_id_range(value: &str) -> Result<RangeInclusive<u32>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("expected format START-END".to_string());
    }
    let parts: Vec<&str> = trimmed.split('-').collect();
    let (start, end) = match parts.as_slice() {
        [single] => {
            let id = parse_id(single, "id")?;
            (id, id)
        }
        [start, end] => (parse_id(start, "START")?, parse_id(end, "END")?),
        _ => return Err("expected format START-END".to_string()),
    };
    if start > end {
        return Err("START must not be greater than END".to_string());
    }
    Ok(start..=end)
}

fn parse_id(value: &str, label: &str) -> Result<u32, String> {
    let id: u32 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid {label} value"))?;
    if id == 0 {
        return Err(format!("{label} must be a positive id"));
    }
    Ok(id)
}

pub fn parse_page_number(value: &str) -> Result<usize, String> {
    let page: usize = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid page '{}'", value.trim()))?;
    if page == 0 {
        return Err("page numbers start at 1".to_string());
    }
    Ok(page)
}
