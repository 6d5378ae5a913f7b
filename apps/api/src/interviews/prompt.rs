//! Voice-agent prompt composition.
//!
//! Every prompt is the same section template with the candidate's details and
//! the occupation's questions substituted in. No branching beyond whether a
//! question list or questionnaire exists for the occupation.

use crate::questions::{questionnaire_for, questions_for};

/// The persona name the agent introduces itself with.
pub const AGENT_NAME: &str = "Joe";

/// Main prompt template.
/// Replace: {agent_name}, {occupation}, {first_name}, {last_name},
///          {role_questions}, {questionnaire}
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"# Personality

You are {agent_name}, a warm, professional and confident AI recruiter with a supportive and inquisitive tone.
You guide voice interviews with empathy and structure, encouraging candidates to speak openly.
You tailor your questions based on the candidate's profession and available data.

# Environment

You are holding a one-on-one phone interview with a candidate for the position of {occupation}.
The candidate's name is {first_name} {last_name}.
Some candidate details may already be known from the initial application form.

# Goal

Conduct a structured, conversational interview by:

1. Confirming their identity and profession.
2. Gently asking for information that was not provided in the initial form submission.
3. Diving deeper into key areas related to {occupation}, such as:
   - Work history and experience
   - Relevant skills, certifications, or licenses
   - Availability to start
   - Transportation and scheduling reliability
   - Willingness to take a drug test (if required)
4. Responding empathetically and conversationally.
5. Summarizing what you've learned to ensure accuracy and completeness.

# Adaptation Logic

Use the known fields from the application form:
- If 'emergencyContact' is missing, ask for it.
- If 'hasReliableTransport' is not provided, ask: "Do you have reliable transportation to and from work?"
- If 'willingToDoDrugTest' is missing, ask politely if the candidate is comfortable with it.
- If resume is missing, ask them to briefly summarize their past work experience.

# Role-Specific Questions

Please ask the following questions related to the role of {occupation}:
{role_questions}
{questionnaire}
# Tone

Keep the tone:
- Friendly but professional
- Encouraging and conversational
- Always clarify you're here to learn more and understand their qualifications

# Ending

- Thank the candidate for their time
- Let them know the next steps will be shared soon
- Keep the closing warm and positive

# Restrictions

- Do not provide legal, medical, or financial advice
- Do not speculate or assume missing data
- Only ask about missing or unclear fields
- Do not repeat known information unnecessarily
"#;

/// Generic persona served when the caller has no pending interview and the
/// fallback policy is active.
pub const FALLBACK_PROMPT: &str = r#"# Personality

You are Joe, a friendly and professional AI recruiter.

# Goal

The caller does not match a scheduled interview. Greet them, ask for their full name,
the position they applied for, and the phone number they used on their application.
Then ask about their work experience, certifications, and availability to start.

# Restrictions

- Do not promise a job offer or specific pay
- Do not provide legal, medical, or financial advice
- Keep the call short and thank the caller at the end
"#;

pub const FALLBACK_FIRST_MESSAGE: &str =
    "Hi, I'm Joe, an AI recruiter. I couldn't find your scheduled interview, but I'd be happy to ask you a few questions. Could you tell me your full name?";

/// The candidate fields interpolated into the prompt.
#[derive(Debug, Clone, Copy)]
pub struct InterviewSubject<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub occupation: &'a str,
}

/// Builds the full agent prompt for a candidate.
pub fn compose_prompt(subject: &InterviewSubject<'_>) -> String {
    INTERVIEW_PROMPT_TEMPLATE
        .replace("{agent_name}", AGENT_NAME)
        .replace("{role_questions}", &format_role_questions(subject.occupation))
        .replace("{questionnaire}", &format_questionnaire(subject.occupation))
        .replace("{occupation}", subject.occupation)
        .replace("{first_name}", subject.first_name)
        .replace("{last_name}", subject.last_name)
}

/// Opening line spoken by the agent. Spanish for `es`, English otherwise.
pub fn first_message(first_name: &str, occupation: &str, language: &str) -> String {
    if language == "es" {
        format!(
            "Hola {first_name}, soy {AGENT_NAME}. Comencemos tu breve entrevista telefónica para el puesto de {occupation}. ¿Estás listo para empezar?"
        )
    } else {
        format!(
            "Hi {first_name}, I'm {AGENT_NAME}. Let's begin your quick voice interview for the position of {occupation}. Are you ready to start?"
        )
    }
}

fn format_role_questions(occupation: &str) -> String {
    questions_for(occupation)
        .iter()
        .map(|q| format!("- {q}\n"))
        .collect()
}

/// Lists the structured questionnaire so the agent collects every table field.
fn format_questionnaire(occupation: &str) -> String {
    let Some(categories) = questionnaire_for(occupation) else {
        return String::new();
    };

    let mut out = String::from(
        "\n# Structured Questionnaire\n\nAlso cover these topics, one category at a time:\n",
    );
    for category in categories {
        out.push_str(&format!("\n## {}\n", category.title));
        for q in category.questions {
            out.push_str(&format!("- {}\n", q.question));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject<'a>(occupation: &'a str) -> InterviewSubject<'a> {
        InterviewSubject {
            first_name: "Maria",
            last_name: "Lopez",
            occupation,
        }
    }

    #[test]
    fn test_prompt_contains_name_and_occupation_verbatim() {
        let prompt = compose_prompt(&subject("Construction Supervisor"));
        assert!(prompt.contains("The candidate's name is Maria Lopez."));
        assert!(prompt.contains("for the position of Construction Supervisor."));
        assert!(prompt.contains("- How many workers have you supervised at one time?"));
        assert!(!prompt.contains('{'), "unreplaced placeholder in prompt");
    }

    #[test]
    fn test_unknown_occupation_has_empty_question_list() {
        let prompt = compose_prompt(&subject("Astronaut"));
        assert!(prompt.contains("related to the role of Astronaut:\n\n"));
        assert!(!prompt.contains("# Structured Questionnaire"));
    }

    #[test]
    fn test_electrician_prompt_lists_questionnaire() {
        let prompt = compose_prompt(&subject("Electrician"));
        assert!(prompt.contains("# Structured Questionnaire"));
        assert!(prompt.contains("## Blueprint Reading & Layouts"));
        assert!(prompt.contains("- Are you experienced with Lock Out Tag Out Procedures?"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(
            compose_prompt(&subject("Driver")),
            compose_prompt(&subject("Driver"))
        );
    }

    #[test]
    fn test_first_message_language_selection() {
        let es = first_message("Maria", "Plumber", "es");
        assert!(es.starts_with("Hola Maria, soy Joe."));
        assert!(es.contains("el puesto de Plumber"));

        let en = first_message("Maria", "Plumber", "en");
        assert!(en.starts_with("Hi Maria, I'm Joe."));

        let other = first_message("Maria", "Plumber", "fr");
        assert_eq!(other, en);
    }
}
