//! Target engine constants and validation.
//!
//! The engine name ends up in the archive file name, so validation doubles
//! as a filename-safety guarantee: every accepted value is lowercase
//! alphanumeric.

use crate::error::CoreError;

/// Unreal Engine 5 target.
pub const ENGINE_UE5: &str = "ue5";
/// Unity target.
pub const ENGINE_UNITY: &str = "unity";
/// Godot target.
pub const ENGINE_GODOT: &str = "godot";
/// Roblox Studio target.
pub const ENGINE_ROBLOX: &str = "roblox";
/// Blender target.
pub const ENGINE_BLENDER: &str = "blender";
/// CryEngine target.
pub const ENGINE_CRYENGINE: &str = "cryengine";
/// Source 2 target.
pub const ENGINE_SOURCE2: &str = "source2";
/// WebGPU target.
pub const ENGINE_WEBGPU: &str = "webgpu";
/// visionOS target.
pub const ENGINE_VISIONOS: &str = "visionos";

/// All engines an export job may target.
pub const VALID_ENGINES: &[&str] = &[
    ENGINE_UE5,
    ENGINE_UNITY,
    ENGINE_GODOT,
    ENGINE_ROBLOX,
    ENGINE_BLENDER,
    ENGINE_CRYENGINE,
    ENGINE_SOURCE2,
    ENGINE_WEBGPU,
    ENGINE_VISIONOS,
];

/// Validate that `engine` is a supported export target.
pub fn validate_engine(engine: &str) -> Result<(), CoreError> {
    if VALID_ENGINES.contains(&engine) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unsupported engine '{engine}'. Must be one of: {VALID_ENGINES:?}"
        )))
    }
}

/// Human-readable display name for a supported engine.
///
/// Falls back to the uppercased identifier for values that are not in the
/// table, mirroring how unknown engines are labelled in status listings.
pub fn engine_display_name(engine: &str) -> String {
    match engine {
        ENGINE_UE5 => "Unreal Engine 5".to_string(),
        ENGINE_UNITY => "Unity 2023.2".to_string(),
        ENGINE_GODOT => "Godot 4.2".to_string(),
        ENGINE_ROBLOX => "Roblox Studio".to_string(),
        ENGINE_BLENDER => "Blender 4.0".to_string(),
        ENGINE_CRYENGINE => "CryEngine 5.7".to_string(),
        ENGINE_SOURCE2 => "Source 2".to_string(),
        ENGINE_WEBGPU => "WebGPU".to_string(),
        ENGINE_VISIONOS => "visionOS".to_string(),
        other => other.to_uppercase(),
    }
}
