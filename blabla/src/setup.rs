//! Everything needed to make one call to an assistant.

/// Connection, assistant definition and assistant configuration, as loaded by
/// the persistence layer and handed to whatever performs the assistant call.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantSetup<C, A, AC> {
    pub connection: C,
    pub assistant: A,
    pub assistant_config: AC,
}

impl<C, A, AC> AssistantSetup<C, A, AC> {
    pub fn new(connection: C, assistant: A, assistant_config: AC) -> Self {
        Self {
            connection,
            assistant,
            assistant_config,
        }
    }

    pub fn into_parts(self) -> (C, A, AC) {
        (self.connection, self.assistant, self.assistant_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Connection {
        endpoint: String,
    }

    #[test]
    fn into_parts_returns_what_went_in() {
        let setup = AssistantSetup::new(
            Connection {
                endpoint: "https://llm.internal/v1".to_string(),
            },
            "helpdesk",
            42_u32,
        );
        assert_eq!(setup.assistant, "helpdesk");

        let (connection, assistant, config) = setup.into_parts();
        assert_eq!(connection.endpoint, "https://llm.internal/v1");
        assert_eq!(assistant, "helpdesk");
        assert_eq!(config, 42);
    }
}
