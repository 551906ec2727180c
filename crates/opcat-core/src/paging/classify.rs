use std::collections::HashSet;

use super::PagingType;

/// Classify a response's pagination style from its top-level property names.
///
/// Rules are tried in a fixed order and the first match wins. Explicit link and
/// cursor fields rank above count-only fields, so reordering the rules changes
/// the outcome for schemas that match more than one.
pub fn classify_paging<'a, I>(props: I) -> PagingType
where
    I: IntoIterator<Item = &'a str>,
{
    let props: HashSet<&str> = props.into_iter().collect();
    let has = |name: &str| props.contains(name);

    if has("nextUri") {
        PagingType::NextUri
    } else if has("nextPage") {
        PagingType::NextPage
    } else if has("cursor") {
        PagingType::Cursor
    } else if has("after") {
        PagingType::After
    } else if has("pageNumber")
        && has("pageSize")
        && (has("pageCount") || has("total") || has("totalCount"))
    {
        PagingType::PageNumber
    } else if has("totalHits") {
        PagingType::TotalHits
    } else if has("startIndex") && has("pageSize") {
        PagingType::StartIndex
    } else {
        PagingType::Unknown
    }
}
