use graphql_parser::Style;
use graphql_parser::query;
use graphql_parser::schema;
use crate::error::GenerateError;
use crate::operations::build_operations;
use crate::scanner::{SchemaIndex, scan_entities};

pub type SchemaDocument = schema::Document<'static, String>;
pub type OutputDocument = query::Document<'static, String>;

/// Generates `GetOne<Entity>` and `GetMany<Entity>s` for every entity of the schema.
///
/// Every entity is checked for its filter type before any operation is built, so a
/// failure never leaves a partial document behind.
pub fn generate_document(schema: &SchemaDocument) -> Result<OutputDocument, GenerateError> {
    let index = SchemaIndex::new(schema);
    let entities = scan_entities(&index)?;
    let definitions = entities
        .iter()
        .flat_map(|entity| build_operations(entity, &index))
        .collect();
    Ok(query::Document { definitions })
}

pub fn print_document(document: &OutputDocument, indent: u32) -> String {
    document.format(Style::default().indent(indent))
}

pub fn print_schema(document: &SchemaDocument, indent: u32) -> String {
    document.format(Style::default().indent(indent))
}
