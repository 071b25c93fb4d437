use thiserror::Error;

/// Errors raised while turning a parsed structure into a scene.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("atom {key} is mapped on only one side of the reaction")]
    Lookup { key: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_message_names_the_atom() {
        let err = Error::Lookup { key: 7 };
        assert_eq!(
            err.to_string(),
            "atom 7 is mapped on only one side of the reaction"
        );
    }
}
