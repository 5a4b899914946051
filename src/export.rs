use tracing::info;

use crate::{
    error::LabelError,
    models::{ExportDocument, ExportRep, Session},
    utils::parse_timestamp,
    validate::is_valid_session,
};

/// Projects a session into its export form. Refuses sessions that fail
/// validation, so no partial document is ever produced.
pub fn encode(session: &Session) -> Result<ExportDocument, LabelError> {
    if !is_valid_session(session) {
        return Err(LabelError::InvalidInterval);
    }

    let exercise_data = session
        .sets()
        .iter()
        .map(|set| {
            set.reps()
                .iter()
                .map(|rep| -> Result<ExportRep, LabelError> {
                    Ok(ExportRep {
                        start: parse_timestamp(&rep.start)?,
                        end: parse_timestamp(&rep.end)?,
                    })
                })
                .collect::<Result<Vec<_>, LabelError>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ExportDocument {
        youtube_url: session.youtube_url().to_string(),
        exercise_type: session.exercise_type(),
        exercise_data,
    })
}

/// Two-space indented JSON.
pub fn to_json(doc: &ExportDocument) -> Result<String, LabelError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Mirrors the document to the diagnostic log, independent of any file.
pub fn log_document(doc: &ExportDocument) -> Result<(), LabelError> {
    let json = to_json(doc)?;
    info!(target: "replabel::export", sets = doc.exercise_data.len(), "Data submitted:\n{json}");
    Ok(())
}
