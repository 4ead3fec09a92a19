//! Attribute parsing for the Filter derive macro.
//!
//! Accepts the forms:
//!
//! ```text
//! #[search("iContains,column=first_name|last_name")]
//! #[search(skip)]       same as #[search("-")]
//! #[search(flatten)]    same as #[search("dive")]
//! ```
//!
//! The annotation string itself is validated at runtime when the predicate
//! compiles; here it only decides how the field is read.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    Attribute, Error, Ident, LitStr, Result, Token,
};

/// How a field takes part in the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Read through `FilterValue`.
    Leaf,
    /// Excluded.
    Ignore,
    /// A nested filter record.
    Dive,
}

/// Field-level attributes from `#[search(...)]`.
#[derive(Debug, Clone)]
pub struct SearchAttr {
    /// The annotation string, if one was given.
    pub annotation: Option<String>,
    pub skip: bool,
    pub flatten: bool,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for SearchAttr {
    fn default() -> Self {
        SearchAttr {
            annotation: None,
            skip: false,
            flatten: false,
            span: Span::call_site(),
        }
    }
}

enum Item {
    Annotation(LitStr),
    Flag(Ident),
}

impl Parse for Item {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(LitStr) {
            input.parse().map(Item::Annotation)
        } else {
            input.parse().map(Item::Flag)
        }
    }
}

impl Parse for SearchAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = SearchAttr {
            span: input.span(),
            ..SearchAttr::default()
        };

        let items: Punctuated<Item, Token![,]> = Punctuated::parse_terminated(input)?;

        for item in items {
            match item {
                Item::Annotation(lit) => {
                    if attr.annotation.is_some() {
                        return Err(Error::new(lit.span(), "duplicate annotation string"));
                    }
                    attr.annotation = Some(lit.value());
                    attr.span = lit.span();
                }
                Item::Flag(ident) if ident == "skip" => attr.skip = true,
                Item::Flag(ident) if ident == "flatten" => attr.flatten = true,
                Item::Flag(ident) => {
                    return Err(Error::new(
                        ident.span(),
                        format!(
                            "unknown search attribute: '{}'. Expected an annotation string, skip, or flatten",
                            ident
                        ),
                    ))
                }
            }
        }

        if (attr.skip || attr.flatten) && attr.annotation.is_some() {
            return Err(Error::new(
                attr.span,
                "skip and flatten cannot be combined with an annotation string",
            ));
        }
        if attr.skip && attr.flatten {
            return Err(Error::new(attr.span, "skip and flatten are mutually exclusive"));
        }

        Ok(attr)
    }
}

impl SearchAttr {
    pub fn role(&self) -> FieldRole {
        if self.skip {
            return FieldRole::Ignore;
        }
        if self.flatten {
            return FieldRole::Dive;
        }
        let head = self
            .annotation
            .as_deref()
            .and_then(|text| text.split(',').next())
            .map(str::trim);
        match head {
            Some("-") => FieldRole::Ignore,
            Some("dive") => FieldRole::Dive,
            _ => FieldRole::Leaf,
        }
    }

    /// Annotation text to record in the field descriptor.
    pub fn text(&self) -> Option<String> {
        if self.skip {
            Some("-".to_string())
        } else if self.flatten {
            Some("dive".to_string())
        } else {
            self.annotation.clone()
        }
    }
}

/// Extract `#[search(...)]` attributes from a field's attributes.
pub fn parse_search_attrs(attrs: &[Attribute]) -> Result<SearchAttr> {
    let mut found = None;
    for attr in attrs {
        if attr.path().is_ident("search") {
            if found.is_some() {
                return Err(Error::new_spanned(attr, "duplicate #[search] attribute"));
            }
            found = Some(attr.parse_args::<SearchAttr>()?);
        }
    }
    Ok(found.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_search(tokens: &str) -> Result<SearchAttr> {
        syn::parse_str::<SearchAttr>(tokens)
    }

    #[test]
    fn test_annotation_string() {
        let attr = parse_search(r#""contains,column=title|body""#).unwrap();
        assert_eq!(attr.annotation.as_deref(), Some("contains,column=title|body"));
        assert_eq!(attr.role(), FieldRole::Leaf);
        assert_eq!(attr.text().as_deref(), Some("contains,column=title|body"));
    }

    #[test]
    fn test_dash_ignores() {
        let attr = parse_search(r#""-""#).unwrap();
        assert_eq!(attr.role(), FieldRole::Ignore);
    }

    #[test]
    fn test_dive_string() {
        let attr = parse_search(r#"" dive ""#).unwrap();
        assert_eq!(attr.role(), FieldRole::Dive);
    }

    #[test]
    fn test_skip_flag() {
        let attr = parse_search("skip").unwrap();
        assert_eq!(attr.role(), FieldRole::Ignore);
        assert_eq!(attr.text().as_deref(), Some("-"));
    }

    #[test]
    fn test_flatten_flag() {
        let attr = parse_search("flatten").unwrap();
        assert_eq!(attr.role(), FieldRole::Dive);
        assert_eq!(attr.text().as_deref(), Some("dive"));
    }

    #[test]
    fn test_operator_named_dive_prefix_is_leaf() {
        let attr = parse_search(r#""diverse""#).unwrap();
        assert_eq!(attr.role(), FieldRole::Leaf);
    }

    #[test]
    fn test_empty_is_leaf() {
        let attr = parse_search("").unwrap();
        assert_eq!(attr.role(), FieldRole::Leaf);
        assert_eq!(attr.text(), None);
    }

    #[test]
    fn test_unknown_flag() {
        let result = parse_search("fuzzy");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown search attribute"));
    }

    #[test]
    fn test_conflicts() {
        assert!(parse_search(r#"skip, "eq""#).is_err());
        assert!(parse_search("skip, flatten").is_err());
        assert!(parse_search(r#""eq", "neq""#).is_err());
    }
}
