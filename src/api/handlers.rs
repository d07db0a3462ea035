//! Request handlers

use std::collections::HashMap;

use axum::{
    extract::{Form, Multipart, Path, Request, State},
    http::header,
    response::{IntoResponse, Response},
    Json, RequestExt,
};

use crate::api::error::ApiError;
use crate::api::types::{
    Submission, SimplifyResponse, AUDIO_FIELDS, CLIP_NOT_FOUND_MESSAGE, EMPTY_TEXT_MESSAGE,
    NO_INPUT_MESSAGE, TEXT_FIELDS,
};
use crate::markup::render_markdown;
use crate::prompts::SYSTEM_PROMPT;
use crate::state::AppState;
use crate::timed_stage;

/// Read the submission from a multipart or urlencoded form.
/// Any other body is treated as carrying no input.
async fn read_submission(req: Request) -> Result<Submission, ApiError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let mut submission = Submission::default();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = req
            .extract::<Multipart, _>()
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {e}")))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed reading multipart field: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if AUDIO_FIELDS.contains(&name.as_str()) {
                let filename = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed reading multipart '{name}' field: {e}"))
                })?;
                submission.set_audio(filename, bytes);
            } else if TEXT_FIELDS.contains(&name.as_str()) {
                let text = field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed reading multipart '{name}' field: {e}"))
                })?;
                submission.set_text(text);
            }
        }
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(mut fields) = req
            .extract::<Form<HashMap<String, String>>, _>()
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid form payload: {e}")))?;

        if let Some(text) = TEXT_FIELDS.iter().find_map(|name| fields.remove(*name)) {
            submission.set_text(text);
        }
    }

    Ok(submission)
}

/// POST /api/simplify - explain legal text from a recording or pasted text
pub async fn simplify(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<SimplifyResponse>, ApiError> {
    let submission = read_submission(req).await?;
    if submission.is_empty() {
        return Err(ApiError::bad_request(NO_INPUT_MESSAGE));
    }

    // Owned for the rest of the request; dropping it deletes the upload
    let upload = match &submission.audio {
        Some(audio) => Some(
            state
                .store
                .save_upload(audio.filename.as_deref(), &audio.bytes)
                .await?,
        ),
        None => None,
    };

    let user_text = match &upload {
        Some(upload) => timed_stage!("Transcription", state.services.transcribe(upload.path()).await)?,
        None => submission.text.unwrap_or_default(),
    };

    if user_text.trim().is_empty() {
        return Err(ApiError::bad_request(EMPTY_TEXT_MESSAGE));
    }

    let explanation = timed_stage!(
        "Conversation",
        state.services.converse(&user_text, SYSTEM_PROMPT).await
    );

    // Speech is generated from the markdown, before HTML conversion
    let audio_filename = timed_stage!(
        "Synthesis",
        state.services.synthesize(&explanation, state.store.dir()).await
    )?;

    let simplified_text = render_markdown(&explanation);

    log::info!("Simplification complete, speech clip {}", audio_filename);
    Ok(Json(SimplifyResponse {
        simplified_text,
        audio_filename,
    }))
}

/// GET /api/audio/{filename} - serve a generated speech clip
pub async fn get_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    match state.store.read_clip(&filename).await? {
        Some(bytes) => Ok(([(header::CONTENT_TYPE, "audio/wav")], bytes).into_response()),
        None => Err(ApiError::not_found(CLIP_NOT_FOUND_MESSAGE)),
    }
}
