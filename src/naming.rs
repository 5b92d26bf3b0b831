/// Derives the root query field for an entity type name.
///
/// The leading run of characters that upper-casing leaves unchanged is lowercased, up to
/// the first character that is not upper-case. A name made only of such characters (an
/// acronym like `URL`) is returned as is.
pub fn query_field_name(type_name: &str) -> String {
    let split = type_name
        .char_indices()
        .find(|(_, c)| c.to_uppercase().ne([*c]))
        .map(|(index, _)| index);

    match split {
        Some(index) => {
            let (prefix, rest) = type_name.split_at(index);
            format!("{}{}", prefix.to_lowercase(), rest)
        }
        None => type_name.to_string(),
    }
}

/// Pluralizes a query field name. Only the trailing `x` case is special.
pub fn pluralize(field_name: &str) -> String {
    if field_name.ends_with('x') {
        format!("{}es", field_name)
    } else {
        format!("{}s", field_name)
    }
}
