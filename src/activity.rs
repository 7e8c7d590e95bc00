use crate::{models, Client};
use clap::ArgEnum;
use eyre::{eyre, Result, WrapErr};
use std::fmt;
use url::Url;

/// Activity suggestion endpoint.
const ENDPOINT: &str = "https://bored.api.lewagon.com/api/activity";

/// Message shown when no activity matches the filters.
pub const NO_MATCH_MESSAGE: &str = "No activity matches these filters";

/// Activity categories accepted by the endpoint's `type` filter.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ArgEnum)]
pub enum ActivityType {
    Education,
    Recreational,
    Social,
    Diy,
    Charity,
    Cooking,
    Relaxation,
    Music,
    Busywork,
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The endpoint wants lowercase category names.
        write!(
            f,
            "{}",
            match self {
                Self::Education => "education",
                Self::Recreational => "recreational",
                Self::Social => "social",
                Self::Diy => "diy",
                Self::Charity => "charity",
                Self::Cooking => "cooking",
                Self::Relaxation => "relaxation",
                Self::Music => "music",
                Self::Busywork => "busywork",
            }
        )
    }
}

/// A suggested activity.
#[derive(Debug)]
pub struct Activity {
    /// What to do.
    description: String,
    /// How many people it takes.
    participants: u32,
    /// Cost indicator, 0 is free.
    price: f64,
    /// Accessibility indicator, 0 is the most accessible.
    accessibility: f64,
}

impl Activity {
    /// Asks the endpoint for a random activity matching the filters.
    ///
    /// Returns `Ok(None)` when no activity matches: the endpoint reports
    /// this as a body without the `activity` field, not as an HTTP error.
    pub fn search(
        client: &Client,
        kind: Option<ActivityType>,
        participants: u32,
    ) -> Result<Option<Self>> {
        let mut url = Url::parse(ENDPOINT).expect("valid activity endpoint");
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(kind) = kind {
                pairs.append_pair("type", &kind.to_string());
            }
            pairs.append_pair("participants", &participants.to_string());
        }

        let response = client
            .get_json::<models::activity::ApiResponse>(&url)
            .context("call activity endpoint")?;

        if response.activity.is_none() {
            return Ok(None);
        }

        response.try_into().map(Some)
    }

    /// Returns the activity description.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The activity is \"{}\".\n\
             Participants:  {}\n\
             Price:         {}€\n\
             Accessibility: {}",
            self.description, self.participants, self.price, self.accessibility,
        )
    }
}

impl TryFrom<models::activity::ApiResponse> for Activity {
    type Error = eyre::Report;

    fn try_from(
        value: models::activity::ApiResponse,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            description: value
                .activity
                .ok_or_else(|| eyre!("missing activity"))?,
            participants: value
                .participants
                .ok_or_else(|| eyre!("missing participants"))?,
            price: value.price.ok_or_else(|| eyre!("missing price"))?,
            accessibility: value
                .accessibility
                .ok_or_else(|| eyre!("missing accessibility"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swimming() -> models::activity::ApiResponse {
        models::activity::ApiResponse {
            activity: Some("Go swimming".to_owned()),
            participants: Some(2),
            price: Some(0.1),
            accessibility: Some(0.3),
        }
    }

    #[test]
    fn render_contains_every_field() {
        let activity = Activity::try_from(swimming()).expect("full response");
        let text = activity.to_string();

        assert!(text.contains("Go swimming"));
        assert!(text.contains('2'));
        assert!(text.contains("0.1"));
        assert!(text.contains("0.3"));
    }

    #[test]
    fn empty_body_means_no_match() {
        let response: models::activity::ApiResponse =
            serde_json::from_str("{}").expect("parse empty body");

        assert!(response.activity.is_none());
    }

    #[test]
    fn partial_body_is_rejected() {
        let mut response = swimming();
        response.price = None;

        assert!(Activity::try_from(response).is_err());
    }

    #[test]
    fn type_filter_uses_endpoint_casing() {
        assert_eq!(ActivityType::Diy.to_string(), "diy");
        assert_eq!(ActivityType::Busywork.to_string(), "busywork");
    }
}
