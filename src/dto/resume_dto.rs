use serde::Deserialize;
use serde_json::Value as JsonValue;
use validator::Validate;

/// Fields collected from the multipart upload form.
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateResumePayload {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub content: String,
    pub file_path: Option<String>,
    pub parsed_data: Option<JsonValue>,
}

impl CreateResumePayload {
    /// Trims the title so a whitespace-only title fails validation.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateResumePayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub content: Option<String>,
    pub parsed_data: Option<JsonValue>,
}

impl UpdateResumePayload {
    pub fn normalized(mut self) -> Self {
        self.title = self.title.map(|t| t.trim().to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_titles_fail_after_trimming() {
        let create = CreateResumePayload {
            title: "   ".to_string(),
            ..Default::default()
        }
        .normalized();
        assert!(create.validate().is_err());

        let update = UpdateResumePayload {
            title: Some("\t ".to_string()),
            content: None,
            parsed_data: None,
        }
        .normalized();
        assert!(update.validate().is_err());
    }

    #[test]
    fn titles_are_stored_trimmed() {
        let create = CreateResumePayload {
            title: "  Backend CV ".to_string(),
            ..Default::default()
        }
        .normalized();
        assert!(create.validate().is_ok());
        assert_eq!(create.title, "Backend CV");
    }
}
