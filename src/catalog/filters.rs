use crate::model::PokemonRecord;

/// Case-insensitive name substring, or exact match against the decimal id.
/// An empty term matches every record.
pub fn matches_search(record: &PokemonRecord, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    if record.name.to_lowercase().contains(&needle) {
        return true;
    }
    record.id.to_string() == term
}

pub fn filter_records<'a, I>(records: I, term: &str) -> Vec<&'a PokemonRecord>
where
    I: IntoIterator<Item = &'a PokemonRecord>,
{
    records
        .into_iter()
        .filter(|r| matches_search(r, term))
        .collect()
}
