//! Header alias resolution.
//!
//! Raw column headers vary by bank and by export ("Txn Date", "DATE\n(Value
//! Date)", "Withdrawal Amt."). An [`AliasTable`] lists the accepted spellings
//! per canonical [`Field`]; matching compares [`normalize_header`] forms, so
//! supporting a new layout means adding aliases, never touching the matcher.

use passbook_core::Field;
use std::collections::BTreeMap;

/// Lowercase, trim, and drop whitespace (newlines included), periods and
/// parentheses.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '.' | '(' | ')'))
        .collect()
}

/// Fields a header must resolve before it is accepted: every group needs at
/// least one of its fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirement {
    groups: Vec<Vec<Field>>,
}

impl Requirement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every listed field is mandatory.
    pub fn all_of(fields: &[Field]) -> Self {
        Self {
            groups: fields.iter().map(|f| vec![*f]).collect(),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.groups.push(vec![field]);
        self
    }

    /// At least one of `fields` is mandatory.
    pub fn any_of(mut self, fields: &[Field]) -> Self {
        self.groups.push(fields.to_vec());
        self
    }

    pub fn is_satisfied_by(&self, map: &HeaderMap) -> bool {
        self.groups
            .iter()
            .all(|group| group.iter().any(|f| map.contains(*f)))
    }
}

/// Ordered alias lists per field, plus the rule a resolved header must pass.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: Vec<(Field, Vec<String>)>,
    requirement: Requirement,
}

impl AliasTable {
    pub fn new(requirement: Requirement) -> Self {
        Self {
            entries: Vec::new(),
            requirement,
        }
    }

    /// Append aliases for `field`, after any already listed.
    pub fn with_aliases(mut self, field: Field, aliases: &[&str]) -> Self {
        let normalized = aliases.iter().map(|a| normalize_header(a));
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, list)) => {
                for alias in normalized {
                    if !list.contains(&alias) {
                        list.push(alias);
                    }
                }
            }
            None => self.entries.push((field, normalized.collect())),
        }
        self
    }

    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirement = requirement;
        self
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    /// Normalized aliases for `field`, in match order.
    pub fn aliases(&self, field: Field) -> &[String] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, list)| list.as_slice())
            .unwrap_or(&[])
    }

    /// Map `headers` to canonical fields.
    ///
    /// For each field the aliases are tried in order and the first header
    /// (left to right) with the same normalized form wins. Returns `None` when
    /// the requirement is not met.
    pub fn resolve<S: AsRef<str>>(&self, headers: &[S]) -> Option<HeaderMap> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();

        let mut map = HeaderMap::default();
        for (field, aliases) in &self.entries {
            let hit = aliases.iter().find_map(|alias| {
                normalized
                    .iter()
                    .position(|h| !h.is_empty() && h == alias)
            });
            if let Some(index) = hit {
                map.insert(*field, index, headers[index].as_ref());
            }
        }

        self.requirement.is_satisfied_by(&map).then_some(map)
    }
}

/// A resolved header column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderColumn {
    pub index: usize,
    pub raw: String,
}

/// Canonical field -> column of the table it was found in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: BTreeMap<Field, HeaderColumn>,
}

impl HeaderMap {
    pub fn insert(&mut self, field: Field, index: usize, raw: &str) {
        self.columns.insert(
            field,
            HeaderColumn {
                index,
                raw: raw.to_string(),
            },
        );
    }

    pub fn get(&self, field: Field) -> Option<&HeaderColumn> {
        self.columns.get(&field)
    }

    pub fn index(&self, field: Field) -> Option<usize> {
        self.get(field).map(|c| c.index)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.columns.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.columns.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One data row viewed through a [`HeaderMap`].
#[derive(Debug, Clone, Copy)]
pub struct MappedRow<'a> {
    cells: &'a [String],
    header: &'a HeaderMap,
}

impl<'a> MappedRow<'a> {
    pub fn new(cells: &'a [String], header: &'a HeaderMap) -> Self {
        Self { cells, header }
    }

    /// Cell for `field`; `""` when the field is unmapped or the row is short.
    pub fn cell(&self, field: Field) -> &'a str {
        self.header
            .index(field)
            .and_then(|i| self.cells.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    pub fn has(&self, field: Field) -> bool {
        self.header.contains(field)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }

    pub fn cells(&self) -> &'a [String] {
        self.cells
    }
}
