use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// Stable identifier of an artist (a MusicBrainz artist MBID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistMbid(String);

impl ArtistMbid {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

}

impl fmt::Display for ArtistMbid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One suggested artist returned by the lookup service for a query.
///
/// Candidates are immutable once received. The order of a candidate list is the relevance order
/// chosen by the lookup service and is kept as-is for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "artist_mbid")]
    pub id: ArtistMbid,
    #[serde(rename = "artist_name")]
    pub display_name: String,
    /// Disambiguation comment, e.g. "US singer-songwriter".
    #[serde(
        default,
        deserialize_with = "deserialize_comment",
        skip_serializing_if = "Option::is_none"
    )]
    pub comment: Option<String>,
}

/// The lookup service sends `""` for artists without a disambiguation comment.
fn deserialize_comment<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let comment = Option::<String>::deserialize(deserializer)?;
    Ok(comment.filter(|comment| !comment.is_empty()))
}

impl Candidate {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: ArtistMbid::new(id),
            display_name: display_name.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into()).filter(|comment| !comment.is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_lookup_service_rows_in_order() {
        let body = r#"[
            {"artist_mbid": "afb680f2-b6eb-4cd7-a70b-a63b25c763d5", "artist_name": "Bruno Mars", "comment": ""},
            {"artist_mbid": "0a8b1b6c-5e0d-4b8a-9c4c-2f0a3c6a6a11", "artist_name": "Bruno Major"}
        ]"#;

        let rows: Vec<Candidate> = serde_json::from_str(body).expect("decode");
        let names: Vec<&str> = rows.iter().map(|c| c.display_name.as_str()).collect();
        assert_eq!(names, vec!["Bruno Mars", "Bruno Major"]);
        assert_eq!(
            rows[0].id,
            ArtistMbid::new("afb680f2-b6eb-4cd7-a70b-a63b25c763d5")
        );
        assert_eq!(rows[0].comment, None);
        assert_eq!(rows[1].comment, None);
    }

    #[test]
    fn decoded_and_built_candidates_agree_on_comments() {
        let body = r#"[
            {"artist_mbid": "a", "artist_name": "Bruno Mars", "comment": ""},
            {"artist_mbid": "b", "artist_name": "Bruno", "comment": "Canadian singer"}
        ]"#;

        let rows: Vec<Candidate> = serde_json::from_str(body).expect("decode");
        assert_eq!(
            rows,
            vec![
                Candidate::new("a", "Bruno Mars").with_comment(""),
                Candidate::new("b", "Bruno").with_comment("Canadian singer"),
            ]
        );
    }

    #[test]
    fn empty_comment_is_dropped() {
        let candidate = Candidate::new("id", "Name").with_comment("");
        assert_eq!(candidate.comment, None);
    }
}
