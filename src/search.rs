use crate::domain::Record;

// Digit-only queries also match ids containing, or contained in, the query.
pub fn matches(record: &Record, query: &str) -> bool {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    matches_normalized(record, &term)
}

pub fn filter<'a>(records: &'a [Record], query: &str) -> Vec<&'a Record> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| matches_normalized(record, &term))
        .collect()
}

pub fn is_active(query: &str) -> bool {
    !query.trim().is_empty()
}

fn matches_normalized(record: &Record, term: &str) -> bool {
    let name_match = record.name.to_lowercase().contains(term);
    let id_match = is_numeric(term) && {
        let id = record.id.to_string();
        id.contains(term) || term.contains(id.as_str())
    };
    let type_match = record
        .types
        .iter()
        .any(|kind| kind.to_lowercase().contains(term));
    let ability_match = record
        .abilities
        .iter()
        .any(|ability| ability.to_lowercase().contains(term));
    name_match || id_match || type_match || ability_match
}

fn is_numeric(term: &str) -> bool {
    !term.is_empty() && term.bytes().all(|byte| byte.is_ascii_digit())
}

#[derive(Debug, Default, Clone)]
pub struct FilterCache {
    key: Option<(u64, String)>,
    indices: Vec<usize>,
}

impl FilterCache {
    pub fn indices(&mut self, version: u64, records: &[Record], query: &str) -> &[usize] {
        let term = query.trim().to_lowercase();
        let fresh = self
            .key
            .as_ref()
            .is_some_and(|(cached_version, cached_term)| {
                *cached_version == version && *cached_term == term
            });
        if !fresh {
            self.indices = records
                .iter()
                .enumerate()
                .filter(|(_, record)| term.is_empty() || matches_normalized(record, &term))
                .map(|(index, _)| index)
                .collect();
            self.key = Some((version, term));
        }
        &self.indices
    }

    pub fn invalidate(&mut self) {
        self.key = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_detection() {
        assert!(is_numeric("25"));
        assert!(is_numeric("007"));
        assert!(!is_numeric("2.5"));
        assert!(!is_numeric("1e3"));
        assert!(!is_numeric("+5"));
        assert!(!is_numeric(".5"));
        assert!(!is_numeric("pika"));
        assert!(!is_numeric(""));
    }
}
