use graphql_parser::schema::parse_schema;
use crate::error::SchemaLoadError;
use crate::generator::SchemaDocument;

pub fn from_sdl_string(sdl: &str) -> Result<SchemaDocument, SchemaLoadError> {
    let document = parse_schema::<String>(sdl)?;
    Ok(document.into_static())
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_parser::schema::{Definition, TypeDefinition};

    #[test]
    fn parses_owned_document() {
        let document = {
            let sdl = String::from("type Post { id: ID! }\ninput Post_filter { id: ID }");
            from_sdl_string(&sdl).unwrap()
        };
        assert_eq!(document.definitions.len(), 2);
        assert!(matches!(
            &document.definitions[1],
            Definition::TypeDefinition(TypeDefinition::InputObject(input)) if input.name == "Post_filter"
        ));
    }

    #[test]
    fn reports_syntax_errors() {
        let error = from_sdl_string("type Post {").unwrap_err();
        assert!(matches!(error, SchemaLoadError::Sdl(_)));
    }
}
