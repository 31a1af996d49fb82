use super::model::Submission;

/// True when the variant's hidden honeypot field was filled in, i.e. a bot.
pub fn is_spam(submission: &Submission, honeypot_field: Option<&str>) -> bool {
    let Some(field) = honeypot_field.filter(|f| !f.is_empty()) else {
        return false;
    };

    submission
        .extras
        .get(field)
        .is_some_and(|value| !value.trim().is_empty())
}
