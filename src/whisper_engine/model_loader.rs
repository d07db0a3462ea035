// Whisper Engine - Model Loading and GPU Detection
use std::path::Path;
use whisper_rs::{WhisperContext, WhisperContextParameters};
use anyhow::{Result, anyhow};

/// Detect available GPU acceleration capabilities
pub fn detect_gpu_acceleration() -> bool {
    // On macOS, prefer Metal GPU acceleration
    if cfg!(feature = "metal") || cfg!(feature = "coreml") {
        log::info!("Metal/CoreML feature enabled - attempting GPU acceleration");
        return true;
    }

    if cfg!(feature = "cuda") {
        log::info!("CUDA feature enabled - attempting GPU acceleration");
        return true;
    }

    if cfg!(feature = "vulkan") {
        log::info!("Vulkan feature enabled - attempting GPU acceleration");
        return true;
    }

    if cfg!(feature = "hipblas") {
        log::info!("hipBLAS feature enabled - attempting GPU acceleration");
        return true;
    }

    log::info!("No GPU acceleration features detected - using CPU processing");
    false
}

/// Log hardware acceleration capabilities
pub fn log_acceleration_capabilities() {
    #[cfg(feature = "metal")]
    log::info!("Apple Metal GPU support: enabled");

    #[cfg(feature = "openblas")]
    log::info!("OpenBLAS CPU optimization: enabled");

    #[cfg(feature = "coreml")]
    log::info!("Apple CoreML support: enabled");

    #[cfg(feature = "cuda")]
    log::info!("NVIDIA CUDA support: enabled");

    #[cfg(feature = "vulkan")]
    log::info!("Vulkan GPU support: enabled");

    #[cfg(feature = "openmp")]
    log::info!("OpenMP parallel processing: enabled");
}

/// Model name as shown in logs, e.g. `ggml-tiny.en`
pub fn model_display_name(model_path: &Path) -> String {
    model_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| model_path.display().to_string())
}

/// Load a ggml whisper model from disk
pub fn load_context(model_path: &Path, use_gpu: bool) -> Result<WhisperContext> {
    if !model_path.is_file() {
        return Err(anyhow!(
            "Whisper model not found at {}. Download a ggml model (e.g. ggml-tiny.en.bin) or set LEGALEASE_WHISPER_MODEL.",
            model_path.display()
        ));
    }

    let model_name = model_display_name(model_path);
    log::info!("Loading model: {}", model_name);

    let context_param = WhisperContextParameters {
        use_gpu,
        gpu_device: 0,
        ..Default::default()
    };

    let path_str = model_path
        .to_str()
        .ok_or_else(|| anyhow!("Model path is not valid UTF-8: {}", model_path.display()))?;

    let ctx = WhisperContext::new_with_params(path_str, context_param)
        .map_err(|e| anyhow!("Failed to load model {}: {}", model_name, e))?;

    log::info!(
        "Successfully loaded model: {} ({})",
        model_name,
        if use_gpu { "GPU acceleration requested" } else { "CPU processing only" }
    );
    Ok(ctx)
}
