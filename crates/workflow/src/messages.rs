//! Text posted to GitHub: commit message, pull request title and body, and the
//! issue comments reporting the outcome.

use pipeline::{IntakeError, IssueNumber, LocationRecord, LocationName, PullRequestLink};

/// Commit message and pull request title for a new location.
pub fn change_title(name: &LocationName) -> String {
    format!("Add {name} to locations")
}

/// Pull request description. Closes the originating issue on merge.
pub fn pull_request_body(issue: IssueNumber, record: &LocationRecord) -> String {
    let population = match record.population.known() {
        Some(count) => count.to_string(),
        None => "TBD".to_string(),
    };
    format!(
        "Closes #{issue}\n\n\
         Adds {name} to the location database with the following details:\n\
         - Population: {population}\n\
         - Coordinates: {coordinates}",
        name = record.name,
        coordinates = record.coordinates,
    )
}

/// Issue comment posted once the pull request is open.
pub fn success_comment(record: &LocationRecord, pull_request: &PullRequestLink) -> String {
    let population = match record.population.known() {
        Some(count) => count.to_string(),
        None => "TBD - please provide in PR review".to_string(),
    };
    format!(
        "Location data gathered:\n\
         - Coordinates: {coordinates}\n\
         - Population: {population}\n\
         \n\
         Created pull request: {url}\n\
         \n\
         Please review the data and update any missing information in the pull request.",
        coordinates = record.coordinates,
        url = pull_request.url,
    )
}

/// Issue comment posted when the run fails.
pub fn failure_comment(error: &IntakeError) -> String {
    format!("Error processing location request: {error}")
}
