//! Gesture evaluation pass: polls each slot's gesture reader once per tick
//! and flattens the recognizer output into a per-frame reading list. No
//! smoothing, no hysteresis; every tick stands alone.

use crate::sensor::{BODY_COUNT, GestureSource, SensorError};
use crate::types::{GestureDefinition, GestureKind, GestureReading, GestureValue};

/// What to do when a gesture name turns out to be all padding. The SDK can
/// hand back a name buffer with nothing in it; skipping that gesture is the
/// default, aborting the frame is available for strict setups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MalformedNamePolicy {
    #[default]
    Skip,
    Fatal,
}

/// Evaluate every registered gesture against every slot. Slots with no new
/// gesture frame or with an invalid tracking id are skipped silently; that is
/// the steady state for empty slots. Device errors abort the frame.
///
/// Discrete non-detections are suppressed. Continuous progress is emitted on
/// every evaluated tick, detection threshold or not.
pub fn evaluate_gestures<G: GestureSource>(
    readers: &mut [G; BODY_COUNT],
    gestures: &[GestureDefinition],
    policy: MalformedNamePolicy,
) -> Result<Vec<GestureReading>, SensorError> {
    let mut readings = Vec::new();

    for (slot, reader) in readers.iter_mut().enumerate() {
        let Some(frame) = reader.acquire_latest()? else {
            continue;
        };
        if !frame.tracking_id_valid() {
            continue;
        }

        for gesture in gestures {
            match gesture.kind {
                GestureKind::Discrete => {
                    let result = frame.discrete_result(gesture)?;
                    if !result.detected {
                        continue;
                    }
                    let Some(name) = resolve_name(gesture, policy)? else {
                        continue;
                    };
                    readings.push(GestureReading {
                        slot,
                        name,
                        value: GestureValue::Discrete {
                            confidence: result.confidence,
                        },
                    });
                }
                GestureKind::Continuous => {
                    let result = frame.continuous_result(gesture)?;
                    let Some(name) = resolve_name(gesture, policy)? else {
                        continue;
                    };
                    readings.push(GestureReading {
                        slot,
                        name,
                        value: GestureValue::Continuous {
                            progress: result.progress,
                        },
                    });
                }
            }
        }
    }

    Ok(readings)
}

fn resolve_name(
    gesture: &GestureDefinition,
    policy: MalformedNamePolicy,
) -> Result<Option<String>, SensorError> {
    let name = gesture.trimmed_name();
    if !name.is_empty() {
        return Ok(Some(name.to_owned()));
    }
    match policy {
        MalformedNamePolicy::Skip => {
            log::warn!("gesture name is all padding, skipping result");
            Ok(None)
        }
        MalformedNamePolicy::Fatal => Err(SensorError::MalformedData(
            "gesture name empty after trimming padding".to_owned(),
        )),
    }
}
