/// Ten usability heuristics, by the code issues are classified with
pub const USABILITY_HEURISTICS: [(&str, &str); 10] = [
    ("01", "Visibility of system status"),
    ("02", "Match between system and the real world"),
    ("03", "User control and freedom"),
    ("04", "Consistency and standards"),
    ("05", "Error prevention"),
    ("06", "Recognition rather than recall"),
    ("07", "Flexibility and efficiency of use"),
    ("08", "Aesthetic and minimalist design"),
    ("09", "Help users recognize, diagnose, and recover from errors"),
    ("10", "Help and documentation"),
];

pub const CRITIQUE_SYSTEM_PROMPT: &str = r#"You are a senior UX designer and accessibility specialist reviewing a single screen of a product design.
You will be given a rendered image of the screen and measurements taken from the design file.

Evaluate the screen against:
{heuristics}

and against these accessibility and visual criteria:
- Text contrast (WCAG 2.1: 4.5:1 for body text, 3:1 for large text)
- Typography: hierarchy, legibility, line length, consistency of sizes and weights
- Color: purposeful use, sufficient differentiation, not the only carrier of meaning
- Layout: alignment, spacing rhythm, grouping, responsiveness cues
- Visual hierarchy: a clear primary action and reading order
- Touch and click targets large enough to hit reliably

Judge only what is visible. Be specific and actionable; avoid generic advice.
"#;

pub const CRITIQUE_OUTPUT_SCHEMA: &str = r#"Respond with a single JSON object and nothing else, with exactly this shape:
{
  "overall_score": <integer 0-100>,
  "summary": "<two or three sentences>",
  "strengths": ["<string>", ...],
  "weaknesses": ["<string>", ...],
  "issues": [
    {
      "heuristic": "<one of 01-10>",
      "severity": "<low | medium | high>",
      "message": "<what is wrong and where>",
      "suggestion": "<how to fix it>"
    }
  ],
  "category_scores": {
    "accessibility": <integer 0-100>,
    "typography": <integer 0-100>,
    "color": <integer 0-100>,
    "layout": <integer 0-100>,
    "hierarchy": <integer 0-100>,
    "usability": <integer 0-100>
  },
  "resources": [{"title": "<string>", "url": "<https url>"}]
}
overall_score, summary and issues are required. Use an empty array when there is nothing to report.
"#;

pub const FRAME_PROMPT: &str = r#"## Screen
- **Name**: {frame_name}
- **Position in file**: {frame_index}
- **Themes**: {themes}

## Measured accessibility
- **Average contrast score**: {average_score}/100 over {text_count} text layers
{contrast_rows}

## Detected interactive elements
{elements}
{context}"#;

pub const FRAME_CONTEXT_PROMPT: &str = r#"
## Audience context
```json
{snapshot}
```
Weigh your findings for this audience.
"#;
