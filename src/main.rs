//! desennui - Suggest a random activity and fetch a matching photo

// Lints {{{

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    future_incompatible,
    rustdoc::all,
    rustdoc::missing_crate_level_docs,
    missing_docs,
    unreachable_pub,
    unsafe_code,
    unused,
    unused_import_braces,
    unused_lifetimes,
    // `unused_qualifications` intentionally omitted: the clap 3.2 derive macro
    // emits a redundantly-qualified path for `default_value_t`, which is a
    // false positive under `#![deny(warnings)]` on this toolchain.
    variant_size_differences,
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::clone_on_ref_ptr,
    clippy::exit,
    clippy::filetype_is_file,
    clippy::float_cmp_const,
    clippy::lossy_float_literal,
    clippy::mem_forget,
    clippy::panic,
    clippy::pattern_type_mismatch,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unneeded_field_pattern,
    clippy::verbose_file_reads,
    clippy::dbg_macro,
    clippy::let_underscore_must_use,
    clippy::todo,
    clippy::unwrap_used,
    clippy::use_debug
)]
#![allow(
    // The 90’s called and wanted their charset back :p
    clippy::non_ascii_literal,
)]

// }}}

use clap::Parser;
use desennui::{
    fs, termio, Activity, ActivityType, Client, Photo, NO_MATCH_MESSAGE,
};
use eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let opts = Opts::parse();
    let client = Client::new();

    // First lookup: an activity matching the filters.
    let spinner = spinner("looking for something to do");
    let activity = Activity::search(&client, opts.r#type, opts.participants);
    spinner.finish_and_clear();

    let activity = match activity.context("get activity")? {
        Some(activity) => activity,
        None => {
            termio::print_warn(NO_MATCH_MESSAGE);
            return Ok(());
        },
    };
    println!("{activity}");

    // Second lookup, keyed off the first: a matching photo.
    // A missing photo is not fatal, the suggestion stands on its own.
    if let Err(err) = fetch_photo(&client, &activity, &opts.output) {
        termio::print_err(&format!("photo lookup failed: {err:#}"));
    }

    Ok(())
}

/// Finds a photo matching the activity and saves its thumbnail.
fn fetch_photo(
    client: &Client,
    activity: &Activity,
    output: &Path,
) -> Result<()> {
    let spinner = spinner("looking for a matching photo");
    let photo = Photo::search(client, activity.description());
    spinner.finish_and_clear();
    let photo = photo.context("search photo")?;

    fs::mkdir_p(output).context("create output directory")?;
    let path = photo
        .download(client, output, activity.description())
        .context("download photo")?;

    termio::print_ok(&format!("photo saved to {}", path.display()));

    Ok(())
}

/// Configures the spinner shown while a request is in flight.
fn spinner(msg: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}"),
    );
    spinner.set_message(msg);
    spinner.enable_steady_tick(120);
    spinner
}

/// CLI options.
#[derive(Parser)]
#[clap(author, version, about)]
pub struct Opts {
    /// Activity category to pick from (random if unset).
    #[clap(short, long = "type", arg_enum, value_parser)]
    r#type: Option<ActivityType>,

    /// Number of participants.
    #[clap(short, long, default_value_t = 1)]
    participants: u32,

    /// Path to the output directory (for the photo).
    #[clap(short, long, default_value = ".")]
    output: PathBuf,
}
