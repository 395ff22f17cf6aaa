//! # Registration checks for components.
//!
//! The trait guarantees `init`/`exit` exist; what remains to check at runtime
//! is the name. Lists may contain `None` entries for optional or disabled
//! components, which are skipped.

use std::collections::HashSet;

use crate::components::{Component, ComponentRef};
use crate::error::ComponentError;

/// Checks a single component.
///
/// `None` passes silently. A component with an empty name fails with
/// [`ComponentError::EmptyName`].
pub fn validate(component: Option<&dyn Component>) -> Result<(), ComponentError> {
    let Some(component) = component else {
        return Ok(());
    };
    if component.name().is_empty() {
        return Err(ComponentError::EmptyName);
    }
    Ok(())
}

/// Checks a registration list, drops `None` entries and rejects duplicate names.
///
/// Order of the remaining components is preserved.
pub(crate) fn validate_all(
    list: Vec<Option<ComponentRef>>,
) -> Result<Vec<ComponentRef>, ComponentError> {
    let mut seen = HashSet::with_capacity(list.len());
    let mut out = Vec::with_capacity(list.len());

    for component in list.into_iter().flatten() {
        validate(Some(component.as_ref()))?;
        if !seen.insert(component.name().to_string()) {
            return Err(ComponentError::DuplicateName {
                name: component.name().to_string(),
            });
        }
        out.push(component);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::components::Emitter;

    struct Named(&'static str);

    impl Component for Named {
        fn name(&self) -> &str {
            self.0
        }
        fn attach(&self, _emitter: Emitter) -> Result<(), ComponentError> {
            Ok(())
        }
        fn init(&self) -> Result<(), ComponentError> {
            Ok(())
        }
        fn exit(&self) -> Result<(), ComponentError> {
            Ok(())
        }
    }

    #[test]
    fn missing_component_passes() {
        assert!(validate(None).is_ok());
    }

    #[test]
    fn empty_name_fails() {
        assert_eq!(validate(Some(&Named(""))), Err(ComponentError::EmptyName));
        assert!(validate(Some(&Named("db"))).is_ok());
    }

    #[test]
    fn list_skips_none_and_keeps_order() {
        let list: Vec<Option<ComponentRef>> = vec![
            Some(Arc::new(Named("a"))),
            None,
            Some(Arc::new(Named("b"))),
        ];
        let out = validate_all(list).unwrap();
        let names: Vec<&str> = out.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn list_rejects_duplicates() {
        let list: Vec<Option<ComponentRef>> =
            vec![Some(Arc::new(Named("a"))), Some(Arc::new(Named("a")))];
        let err = validate_all(list).err().unwrap();
        assert_eq!(err, ComponentError::DuplicateName { name: "a".into() });
    }
}
