//! Chat prompts for the OpenAI-compatible backend.

/// A system + user message pair with its sampling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

pub fn analysis(code: &str, language: &str) -> Prompt {
    Prompt {
        system: "You are an expert code reviewer and refactoring specialist. \
                 Provide detailed, actionable analysis in JSON format."
            .to_string(),
        user: format!(
            r#"Analyze the following {language} code for potential refactoring opportunities.
Focus on:
1. Code complexity and readability
2. Performance issues
3. Code smells (long methods, duplicate code, etc.)
4. Best practices violations
5. Security concerns

Code:
{code}

Respond with JSON only, using this structure:
{{
    "complexity_score": 1-10,
    "readability_score": 1-10,
    "issues": [
        {{
            "type": "complexity|readability|performance|security|best_practice",
            "severity": "low|medium|high|critical",
            "description": "Description of the issue",
            "line_numbers": [1, 2, 3],
            "suggestion": "How to fix this issue"
        }}
    ],
    "overall_assessment": "Brief summary of code quality"
}}"#
        ),
        temperature: 0.1,
        max_tokens: 2000,
    }
}

pub fn refactor(code: &str, language: &str, focus_areas: &str) -> Prompt {
    Prompt {
        system: format!(
            "You are an expert {language} developer and refactoring specialist. \
             Always maintain functionality while improving code quality."
        ),
        user: format!(
            r#"Refactor the following {language} code to improve {focus_areas}.

Requirements:
1. Maintain the same functionality
2. Improve code quality and readability
3. Follow {language} best practices
4. Add helpful comments where appropriate
5. Optimize performance if possible

Original Code:
{code}

Respond with JSON only, using this structure:
{{
    "refactored_code": "The improved code",
    "explanation": "Detailed explanation of what was changed and why"
}}"#
        ),
        temperature: 0.2,
        max_tokens: 3000,
    }
}

pub fn suggestions(code: &str, language: &str) -> Prompt {
    Prompt {
        system: format!(
            "You are an expert {language} developer providing actionable improvement suggestions."
        ),
        user: format!(
            r#"Analyze the following {language} code and suggest specific improvements.
Focus on actionable, specific suggestions that can be implemented.

Code:
{code}

Respond with JSON only, using this structure:
{{
    "suggestions": [
        {{
            "category": "readability|performance|security|maintainability|best_practice",
            "priority": "low|medium|high|critical",
            "title": "Brief title of the suggestion",
            "description": "Detailed description of the improvement",
            "example": "Code example showing the improvement",
            "rationale": "Why this improvement is beneficial"
        }}
    ]
}}"#
        ),
        temperature: 0.1,
        max_tokens: 2000,
    }
}

pub fn explanation(code: &str, language: &str) -> Prompt {
    Prompt {
        system: format!(
            "You are an expert {language} developer and educator. \
             Provide clear, detailed explanations."
        ),
        user: format!(
            r#"Explain the following {language} code in detail. Include:
1. What the code does overall
2. How each major function/class works
3. Key algorithms or patterns used
4. Any important variables or data structures
5. Potential edge cases or considerations

Code:
{code}

Provide a clear, educational explanation suitable for developers."#
        ),
        temperature: 0.1,
        max_tokens: 1500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_embed_code_and_language() {
        let p = refactor("x = 1", "python", "performance, security");
        assert!(p.system.contains("python"));
        assert!(p.user.contains("x = 1"));
        assert!(p.user.contains("improve performance, security"));
    }

    #[test]
    fn json_prompts_show_literal_braces() {
        let p = analysis("x = 1", "python");
        assert!(p.user.contains("\"complexity_score\": 1-10"));
        assert!(p.user.contains("{\n"));
    }
}
