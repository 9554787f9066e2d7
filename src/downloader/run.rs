//! The download run: inputs in, task result out.

use std::path::PathBuf;

use super::UniversalDownloader;
use crate::auth::{self, AuthSources};
use crate::config::TaskInputs;
use crate::error::{Error, Result};
use crate::identity;
use crate::invocation;
use crate::messages;
use crate::outcome;
use crate::types::{
    FeedType, PackageRequest, RunReport, Stage, TaskResult, TelemetryEvent, TerminalState,
};

/// How a run that raised no error ended
enum Completion {
    Downloaded,
    NothingToDo,
}

impl UniversalDownloader {
    /// Run one download
    ///
    /// Never returns an error: every failure is logged to the host, turned
    /// into a failed task result, and summarized in the returned report.
    ///
    /// An empty download directory is not a failure. The run warns and ends
    /// successfully without touching the network or the artifact tool.
    pub async fn run(&self) -> RunReport {
        let mut stage = Stage::Start;

        match self.execute(&mut stage).await {
            Ok(Completion::Downloaded) => {
                self.host
                    .set_result(TaskResult::Succeeded, messages::PACKAGES_DOWNLOADED);
                RunReport {
                    state: TerminalState::Succeeded,
                    last_stage: Stage::Reported,
                    message: Some(messages::PACKAGES_DOWNLOADED.to_string()),
                }
            }
            Ok(Completion::NothingToDo) => {
                self.host.set_result(
                    TaskResult::Succeeded,
                    messages::DOWNLOAD_DIRECTORY_NOT_FOUND,
                );
                RunReport {
                    state: TerminalState::FailedEarly,
                    last_stage: stage,
                    message: Some(messages::DOWNLOAD_DIRECTORY_NOT_FOUND.to_string()),
                }
            }
            Err(Error::NoSourceSpecified { endpoint }) => {
                tracing::warn!(endpoint = %endpoint, "external endpoint not found");
                self.host
                    .set_result(TaskResult::Failed, messages::NO_SOURCE_SPECIFIED);
                RunReport {
                    state: TerminalState::FailedReported,
                    last_stage: stage,
                    message: Some(messages::NO_SOURCE_SPECIFIED.to_string()),
                }
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    code = e.error_code(),
                    kind = ?e.kind(),
                    stage = ?stage,
                    "package download failed"
                );
                self.host.error(&outcome::describe(&e));
                self.host
                    .set_result(TaskResult::Failed, messages::PACKAGES_FAILED);
                RunReport {
                    state: TerminalState::FailedReported,
                    last_stage: stage,
                    message: Some(messages::PACKAGES_FAILED.to_string()),
                }
            }
        }
    }

    async fn execute(&self, stage: &mut Stage) -> Result<Completion> {
        *stage = Stage::DirectoryCheck;
        let inputs = TaskInputs::from_host(self.host.as_ref());
        if inputs.download_directory.is_empty() {
            self.host.warning(messages::DOWNLOAD_DIRECTORY_NOT_FOUND);
            return Ok(Completion::NothingToDo);
        }

        let feed_type: FeedType = inputs.feed_type.parse()?;
        *stage = Stage::FeedTypeResolved;

        let sources = AuthSources::from_host(self.host.as_ref(), &inputs);
        let auth = auth::resolve_for(feed_type, &inputs, &sources)?;
        *stage = Stage::AuthResolved;
        tracing::debug!(feed_type = %feed_type, service_uri = %auth.service_uri, "resolved feed authentication");

        let (package_name, package_version) = match feed_type {
            FeedType::Internal => {
                let name = identity::resolve_name(
                    self.identity.as_ref(),
                    &auth.service_uri,
                    &auth.token,
                    &auth.feed_id,
                    &inputs.internal_package_id,
                )
                .await?;
                *stage = Stage::IdentityResolved;
                (name, inputs.internal_version.clone())
            }
            FeedType::External => (
                inputs.external_package.clone(),
                inputs.external_version.clone(),
            ),
        };

        self.host.debug(messages::USING_ARTIFACT_TOOL);

        let request = PackageRequest {
            feed_id: auth.feed_id.clone(),
            package_name,
            package_version,
            destination: PathBuf::from(&inputs.download_directory),
        };
        let spec = invocation::build(
            &self.artifact_tool_path,
            &request,
            &auth,
            &inputs.verbosity,
        );

        self.host.info(&messages::downloading(
            &request.package_name,
            &request.package_version,
            &request.feed_id,
        ));

        let result = match self.tool.invoke(&spec).await {
            Ok(result) => result,
            Err(e) => {
                // The tool never produced an exit code
                self.telemetry.publish(TelemetryEvent::download_failed(-1));
                return Err(e);
            }
        };
        *stage = Stage::Invoked;

        let stdout = result.stdout.trim_end();
        if !stdout.is_empty() {
            self.host.info(stdout);
        }
        // Failures repeat stderr in the error message
        let stderr = result.stderr.trim_end();
        if !stderr.is_empty() {
            self.host.debug(stderr);
        }

        outcome::report(&result, self.telemetry.as_ref())?;
        Ok(Completion::Downloaded)
    }
}
