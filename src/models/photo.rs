//! Declared shape of the photo search endpoint response.
//!
//! The table enumerates the full payload even though only
//! `results[0].urls.small` is consumed downstream: everything the API
//! sends is checked before anything is read.

use crate::schema::{field, Field, Schema, Shape};
use once_cell::sync::Lazy;

/// Name of the root shape, entry point for casting a response body.
pub const SEARCH_RESULTS: &str = "SearchResults";

/// Undeclared fields are rejected: the table mirrors the API
/// exhaustively, so a new field added upstream fails the cast at runtime.
fn record(fields: Vec<Field>) -> Shape {
    Shape::Record { fields, extra: Box::new(Shape::Never) }
}

/// Shape table for the photo search response.
pub static SCHEMA: Lazy<Schema> = Lazy::new(|| {
    let mut schema = Schema::new();

    schema.define(
        SEARCH_RESULTS,
        record(vec![
            field("total", Shape::Int),
            field("total_pages", Shape::Int),
            field("results", Shape::list(Shape::Ref("Photo"))),
        ]),
    );
    schema.define(
        "Photo",
        record(vec![
            field("id", Shape::Str),
            field("slug", Shape::Str),
            field("alternative_slugs", Shape::Ref("AlternativeSlugs")),
            field("created_at", Shape::Date),
            field("updated_at", Shape::Date),
            field("promoted_at", Shape::nullable(Shape::Date)),
            field("width", Shape::Int),
            field("height", Shape::Int),
            field("color", Shape::Str),
            field("blur_hash", Shape::Str),
            field("description", Shape::nullable(Shape::Str)),
            field("alt_description", Shape::Str),
            field("breadcrumbs", Shape::list(Shape::Ref("Breadcrumb"))),
            field("urls", Shape::Ref("Urls")),
            field("links", Shape::Ref("PhotoLinks")),
            field("likes", Shape::Int),
            field("liked_by_user", Shape::Bool),
            field("current_user_collections", Shape::list(Shape::Any)),
            field("sponsorship", Shape::Null),
            field("topic_submissions", Shape::Ref("TopicSubmissions")),
            field("asset_type", Shape::Ref("AssetType")),
            field("user", Shape::Ref("User")),
        ]),
    );
    schema.define(
        "AlternativeSlugs",
        record(vec![
            field("en", Shape::Str),
            field("es", Shape::Str),
            field("ja", Shape::Str),
            field("fr", Shape::Str),
            field("it", Shape::Str),
            field("ko", Shape::Str),
            field("de", Shape::Str),
            field("pt", Shape::Str),
        ]),
    );
    schema.define(
        "Breadcrumb",
        record(vec![
            field("slug", Shape::Str),
            field("title", Shape::Str),
            field("index", Shape::Int),
            field("type", Shape::Str),
        ]),
    );
    schema.define(
        "Urls",
        record(vec![
            field("raw", Shape::Str),
            field("full", Shape::Str),
            field("regular", Shape::Str),
            field("small", Shape::Str),
            field("thumb", Shape::Str),
            field("small_s3", Shape::Str),
        ]),
    );
    schema.define(
        "PhotoLinks",
        record(vec![
            field("self", Shape::Str),
            field("html", Shape::Str),
            field("download", Shape::Str),
            field("download_location", Shape::Str),
        ]),
    );
    schema.define(
        "TopicSubmissions",
        record(vec![
            field("nature", Shape::optional(Shape::Ref("TopicStatus"))),
            field("travel", Shape::optional(Shape::Ref("Travel"))),
            field("wallpapers", Shape::optional(Shape::Ref("TopicStatus"))),
            field(
                "textures-patterns",
                Shape::optional(Shape::Ref("TopicStatus")),
            ),
            field("health", Shape::optional(Shape::Ref("TopicStatus"))),
            field(
                "current-events",
                Shape::optional(Shape::Ref("TopicStatus")),
            ),
        ]),
    );
    schema.define(
        "TopicStatus",
        record(vec![field("status", Shape::Str)]),
    );
    schema.define(
        "Travel",
        record(vec![
            field("status", Shape::Str),
            field("approved_on", Shape::optional(Shape::Date)),
        ]),
    );
    schema.define("AssetType", Shape::Enum(vec!["photo"]));
    schema.define(
        "User",
        record(vec![
            field("id", Shape::Str),
            field("updated_at", Shape::Date),
            field("username", Shape::Str),
            field("name", Shape::Str),
            field("first_name", Shape::Str),
            field("last_name", Shape::Str),
            field("twitter_username", Shape::nullable(Shape::Str)),
            field("portfolio_url", Shape::nullable(Shape::Str)),
            field("bio", Shape::Str),
            field("location", Shape::nullable(Shape::Str)),
            field("links", Shape::Ref("UserLinks")),
            field("profile_image", Shape::Ref("ProfileImage")),
            field("instagram_username", Shape::nullable(Shape::Str)),
            field("total_collections", Shape::Int),
            field("total_likes", Shape::Int),
            field("total_photos", Shape::Int),
            field("total_promoted_photos", Shape::Int),
            field("total_illustrations", Shape::Int),
            field("total_promoted_illustrations", Shape::Int),
            field("accepted_tos", Shape::Bool),
            field("for_hire", Shape::Bool),
            field("social", Shape::Ref("Social")),
        ]),
    );
    schema.define(
        "UserLinks",
        record(vec![
            field("self", Shape::Str),
            field("html", Shape::Str),
            field("photos", Shape::Str),
            field("likes", Shape::Str),
            field("portfolio", Shape::Str),
            field("following", Shape::Str),
            field("followers", Shape::Str),
        ]),
    );
    schema.define(
        "ProfileImage",
        record(vec![
            field("small", Shape::Str),
            field("medium", Shape::Str),
            field("large", Shape::Str),
        ]),
    );
    schema.define(
        "Social",
        record(vec![
            field("instagram_username", Shape::nullable(Shape::Str)),
            field("portfolio_url", Shape::nullable(Shape::Str)),
            field("twitter_username", Shape::nullable(Shape::Str)),
            field("paypal_email", Shape::Null),
        ]),
    );

    schema
});
