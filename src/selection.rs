use graphql_parser::query::{Field, Selection, SelectionSet};
use graphql_parser::schema;
use graphql_parser::schema::Type;
use crate::operations::{field, selection_set};
use crate::scanner::SchemaIndex;

/// Number of field-to-object hops expanded below an entity's own fields.
pub const MAX_SELECTION_DEPTH: usize = 3;

/// Strips list and non-null wrappers down to the named type.
pub fn named_type<'t>(field_type: &'t Type<'static, String>) -> &'t str {
    match field_type {
        Type::NamedType(name) => name.as_str(),
        Type::NonNullType(inner) => named_type(inner),
        Type::ListType(inner) => named_type(inner),
    }
}

/// Selects every field, descending into object-typed fields until the depth bound.
///
/// Fields whose type is not an object type (scalars, enums, interfaces, unknown names)
/// and any field at the depth bound become leaves, which keeps cyclic type graphs finite.
pub fn expand_fields(
    fields: &[schema::Field<'static, String>],
    index: &SchemaIndex<'_>,
    depth: usize
) -> SelectionSet<'static, String> {
    let items = fields
        .iter()
        .map(|definition| Selection::Field(expand_field(definition, index, depth)))
        .collect();
    selection_set(items)
}

fn expand_field(
    definition: &schema::Field<'static, String>,
    index: &SchemaIndex<'_>,
    depth: usize
) -> Field<'static, String> {
    let nested = match index.object(named_type(&definition.field_type)) {
        Some(object) if depth < MAX_SELECTION_DEPTH => expand_fields(&object.fields, index, depth + 1),
        _ => selection_set(Vec::new()),
    };
    field(&definition.name, Vec::new(), nested)
}
