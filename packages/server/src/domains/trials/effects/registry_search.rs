//! Registry search with ordered fallback across API shapes.

use registry_client::{QueryShape, StudyRecord};

use crate::domains::trials::error::{Result, TrialsError};
use crate::kernel::BaseRegistry;

/// Normalized studies and the shape that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryHit {
    pub shape: QueryShape,
    pub studies: Vec<StudyRecord>,
}

/// Try each shape in priority order, one at a time, stopping at the first
/// that yields studies.
///
/// A shape whose request fails, or whose payload is not the expected
/// envelope, or that yields no studies, moves the search on to the next
/// shape. If no shape yields studies but one answered with a well-formed
/// empty result, that empty result is returned. Only when every shape
/// failed outright is the registry reported unavailable.
pub async fn search_registry(
    registry: &dyn BaseRegistry,
    expr: &str,
    page_size: u32,
) -> Result<RegistryHit> {
    let mut attempts = Vec::new();
    let mut empty_hit = None;

    for shape in QueryShape::ALL {
        let payload = match registry.search(expr, shape, page_size).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(shape = %shape, error = %e, "Registry shape failed");
                attempts.push(format!("{}: {}", shape, e));
                continue;
            }
        };

        match shape.normalize(&payload) {
            Some(studies) if !studies.is_empty() => {
                tracing::info!(shape = %shape, count = studies.len(), "Registry search succeeded");
                return Ok(RegistryHit { shape, studies });
            }
            Some(_) => {
                tracing::debug!(shape = %shape, "Registry shape returned no studies");
                attempts.push(format!("{}: empty", shape));
                empty_hit.get_or_insert(RegistryHit {
                    shape,
                    studies: Vec::new(),
                });
            }
            None => {
                tracing::warn!(shape = %shape, "Registry payload had unexpected shape");
                attempts.push(format!("{}: invalid payload", shape));
            }
        }
    }

    match empty_hit {
        Some(hit) => Ok(hit),
        None => Err(TrialsError::RegistryUnavailable { attempts }),
    }
}
