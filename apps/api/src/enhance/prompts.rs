//! Prompt templates for the LLM-backed advisor.

use crate::enhance::ExplainInput;

pub const EXPLAIN_SYSTEM: &str = "You are a helpful career advisor specializing in resume \
    optimization for Applicant Tracking Systems (ATS). Provide clear, actionable advice.";

pub const REWRITE_SYSTEM: &str = "You are a resume writing expert. Convert vague resume lines \
    into quantified, impactful statements. \
    You MUST respond with valid JSON only: an object containing a \"suggestions\" array. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

fn present(flag: bool) -> &'static str {
    if flag {
        "Present"
    } else {
        "Missing"
    }
}

pub fn build_explain_prompt(input: &ExplainInput) -> String {
    let raw = &input.raw_findings;
    let mut prompt = String::from(
        "Analyze this resume's ATS compatibility and provide improvement suggestions.\n\n",
    );
    prompt.push_str(&format!("ATS Score: {}/100\n\n", input.ats_score));

    if !input.issues.is_empty() {
        prompt.push_str("Detected Issues:\n");
        for (idx, issue) in input.issues.iter().enumerate() {
            prompt.push_str(&format!("{}. {}: {}\n", idx + 1, issue.title, issue.description));
        }
        prompt.push('\n');
    }

    let formatting = match (raw.has_tables, raw.has_columns) {
        (true, true) => "Tables detected, Columns detected",
        (true, false) => "Tables detected",
        (false, true) => "Columns detected",
        (false, false) => "None",
    };
    let pages = if raw.page_count > 0.0 { raw.page_count } else { 1.0 };

    prompt.push_str("Resume Analysis:\n");
    prompt.push_str(&format!("- Contact Information: {}\n", present(raw.has_contact_info)));
    prompt.push_str(&format!("- Work Experience: {}\n", present(raw.has_experience)));
    prompt.push_str(&format!("- Education: {}\n", present(raw.has_education)));
    prompt.push_str(&format!("- Skills Section: {}\n", present(raw.has_skills)));
    prompt.push_str(&format!(
        "- Keyword Match: {}/{} keywords matched\n",
        raw.keyword_matches, raw.total_keywords
    ));
    prompt.push_str(&format!("- Formatting Issues: {formatting}\n"));
    prompt.push_str(&format!("- Resume Length: {pages} page(s)\n\n"));

    prompt.push_str(
        "Provide:\n\
         1. A brief explanation of why the resume received this ATS score\n\
         2. Top 3-5 actionable improvement suggestions\n\
         3. Specific keyword recommendations if keyword match is low\n\
         4. Formatting tips if issues were detected\n\n\
         Keep the response concise, practical, and easy to understand. Use bullet points where appropriate.",
    );
    prompt
}

pub fn build_rewrite_prompt(lines: &[String]) -> String {
    let numbered: Vec<String> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{}. {line}", i + 1))
        .collect();

    format!(
        "Convert these vague resume lines into quantified, impactful statements.\n\n\
         For each line below, provide ONE improved version that:\n\
         1. Includes specific numbers, percentages, or metrics\n\
         2. Uses strong action verbs\n\
         3. Shows measurable impact\n\
         4. Is realistic and professional\n\n\
         Format your response as JSON object: {{\"suggestions\": [{{\"original\": \"...\", \"improved\": \"...\"}}]}}\n\n\
         Lines to improve:\n{}\n\n\
         Return only the JSON object, no other text.",
        numbered.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhance::IssueSummary;
    use crate::models::analysis::RawFindings;

    #[test]
    fn test_explain_prompt_contents() {
        let input = ExplainInput {
            ats_score: 72,
            issues: vec![IssueSummary {
                title: "Tables Detected".into(),
                description: "Tables break parsing.".into(),
            }],
            raw_findings: RawFindings {
                has_contact_info: true,
                has_tables: true,
                has_columns: true,
                keyword_matches: 4,
                total_keywords: 9,
                page_count: 2.0,
                ..Default::default()
            },
        };
        let prompt = build_explain_prompt(&input);
        assert!(prompt.contains("ATS Score: 72/100\n\n"));
        assert!(prompt.contains("1. Tables Detected: Tables break parsing.\n"));
        assert!(prompt.contains("- Contact Information: Present\n"));
        assert!(prompt.contains("- Work Experience: Missing\n"));
        assert!(prompt.contains("- Keyword Match: 4/9 keywords matched\n"));
        assert!(prompt.contains("- Formatting Issues: Tables detected, Columns detected\n"));
        assert!(prompt.contains("- Resume Length: 2 page(s)\n"));
    }

    #[test]
    fn test_missing_page_count_reads_as_one() {
        let prompt = build_explain_prompt(&ExplainInput::default());
        assert!(prompt.contains("- Resume Length: 1 page(s)"));
        assert!(!prompt.contains("Detected Issues"));
    }

    #[test]
    fn test_rewrite_prompt_numbers_lines() {
        let prompt = build_rewrite_prompt(&["Helped the team".into(), "Did various tasks".into()]);
        assert!(prompt.contains("Lines to improve:\n1. Helped the team\n2. Did various tasks\n\n"));
        assert!(prompt.contains(r#"{"suggestions": [{"original": "...", "improved": "..."}]}"#));
    }
}
