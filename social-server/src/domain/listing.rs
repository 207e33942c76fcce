//! Search, exact-match filters and ordering accepted by the list endpoints.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A field clients may order by. Every implementation is a closed allow-list.
pub(crate) trait SortField: Copy + PartialEq + Sized {
    fn parse(name: &str) -> Option<Self>;
    fn column(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SortKey<F> {
    pub(crate) field: F,
    pub(crate) direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PostSortField {
    CreatedAt,
    UpdatedAt,
    Title,
}

impl SortField for PostSortField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "created_at" => Some(Self::CreatedAt),
            "updated_at" => Some(Self::UpdatedAt),
            "title" => Some(Self::Title),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommentSortField {
    CreatedAt,
    UpdatedAt,
}

impl SortField for CommentSortField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "created_at" => Some(Self::CreatedAt),
            "updated_at" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Parses `ordering=-created_at,title`. Unknown and repeated fields are
/// dropped; an empty result means "default order".
pub(crate) fn parse_ordering<F: SortField>(raw: Option<&str>) -> Vec<SortKey<F>> {
    let mut keys: Vec<SortKey<F>> = Vec::new();
    for token in raw.unwrap_or_default().split(',').map(str::trim) {
        let (name, direction) = match token.strip_prefix('-') {
            Some(name) => (name, SortDirection::Desc),
            None => (token, SortDirection::Asc),
        };
        let Some(field) = F::parse(name) else {
            continue;
        };
        if keys.iter().any(|key| key.field == field) {
            continue;
        }
        keys.push(SortKey { field, direction });
    }
    keys
}

/// Splits `search=` into terms; every term has to match at least one searched
/// field.
pub(crate) fn parse_search_terms(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PostQuery {
    pub(crate) search: Vec<String>,
    pub(crate) author_id: Option<i64>,
    pub(crate) ordering: Vec<SortKey<PostSortField>>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CommentQuery {
    pub(crate) search: Vec<String>,
    pub(crate) post_id: Option<i64>,
    pub(crate) author_id: Option<i64>,
    pub(crate) ordering: Vec<SortKey<CommentSortField>>,
}

#[cfg(test)]
mod tests {
    use super::{
        CommentSortField, PostSortField, SortDirection, SortKey, parse_ordering,
        parse_search_terms,
    };

    #[test]
    fn parse_ordering_reads_direction_prefix() {
        let keys = parse_ordering::<PostSortField>(Some("-created_at, title"));
        assert_eq!(
            keys,
            vec![
                SortKey {
                    field: PostSortField::CreatedAt,
                    direction: SortDirection::Desc
                },
                SortKey {
                    field: PostSortField::Title,
                    direction: SortDirection::Asc
                },
            ]
        );
    }

    #[test]
    fn parse_ordering_ignores_fields_outside_allow_list() {
        let keys = parse_ordering::<CommentSortField>(Some("title,-password,updated_at"));
        assert_eq!(
            keys,
            vec![SortKey {
                field: CommentSortField::UpdatedAt,
                direction: SortDirection::Asc
            }]
        );
        assert!(parse_ordering::<PostSortField>(None).is_empty());
    }

    #[test]
    fn parse_ordering_keeps_first_occurrence_of_a_field() {
        let keys = parse_ordering::<PostSortField>(Some("title,-title"));
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].direction, SortDirection::Asc);
    }

    #[test]
    fn parse_search_terms_splits_on_whitespace() {
        assert_eq!(
            parse_search_terms(Some("  rust   Axum ")),
            vec!["rust".to_string(), "Axum".to_string()]
        );
        assert!(parse_search_terms(Some("   ")).is_empty());
    }
}
