use crate::pipeline::analysis::normalize::PLACEHOLDER_VIDEO_ID;

/// Fixed instruction sent with every package photo.
///
/// Describes the exact JSON shape the normalizer expects and asks the model
/// for defaults rather than nulls on failure.
pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"
You are a medical assistant specialized in analyzing medicine packaging.
Analyze the provided image of a medicine package and extract the following
details: name, generic name, description, ingredients, manufacturer, dosage
instructions, side effects, precautions, and a relevant educational video
identifier.

Respond with a single JSON object matching this structure exactly:
{
  "name": string,
  "genericName": string,
  "description": string,
  "ingredients": string[],
  "manufacturer": string,
  "dosage": string,
  "sideEffects": string[],
  "precautions": string[],
  "educationalVideoId": string
}

If the image is unclear or no medicine can be identified, still return a JSON
object with default values indicating failure — never null or missing fields —
and put a clear error message in the description field.
"#;

/// Build the full extraction prompt for one image.
pub fn build_extraction_prompt() -> String {
    format!(
        "{EXTRACTION_SYSTEM_PROMPT}\nIf no suitable educational video is known, \
         use \"{PLACEHOLDER_VIDEO_ID}\" as the educationalVideoId."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_describes_every_record_field() {
        for field in [
            "name",
            "genericName",
            "description",
            "ingredients",
            "manufacturer",
            "dosage",
            "sideEffects",
            "precautions",
            "educationalVideoId",
        ] {
            assert!(
                EXTRACTION_SYSTEM_PROMPT.contains(field),
                "prompt is missing field {field}"
            );
        }
    }

    #[test]
    fn prompt_demands_json_and_forbids_nulls() {
        assert!(EXTRACTION_SYSTEM_PROMPT.contains("JSON object"));
        assert!(EXTRACTION_SYSTEM_PROMPT.contains("never null"));
    }

    #[test]
    fn full_prompt_names_the_placeholder_video() {
        assert!(build_extraction_prompt().contains(PLACEHOLDER_VIDEO_ID));
    }
}
