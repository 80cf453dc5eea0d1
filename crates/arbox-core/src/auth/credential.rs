use std::sync::{Arc, PoisonError, RwLock};

/// Shared cell holding the current session token.
///
/// Cloning shares the cell: the transport reads it on every request, the
/// session manager is the only writer. An empty string means "no token".
#[derive(Debug, Clone, Default)]
pub struct Credential {
    token: Arc<RwLock<String>>,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(token.into())),
        }
    }

    /// Current token value (possibly empty)
    pub fn get(&self) -> String {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    pub(crate) fn set(&self, token: String) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    pub(crate) fn clear(&self) {
        self.token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_cell() {
        let cell = Credential::new("first");
        let reader = cell.clone();

        cell.set("second".to_string());
        assert_eq!(reader.get(), "second");

        cell.clear();
        assert!(reader.is_empty());
        assert_eq!(reader.get(), "");
    }

    #[test]
    fn test_default_is_empty() {
        assert!(Credential::default().is_empty());
    }
}
