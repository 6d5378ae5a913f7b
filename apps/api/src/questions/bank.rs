//! Open-ended interview questions, keyed by occupation label.
//!
//! Labels are matched exactly as the hiring system submits them. An unknown
//! label yields an empty slice; the prompt is still built without a question list.

/// Occupation labels the bank has questions for.
pub const SUPPORTED_OCCUPATIONS: &[&str] = &[
    "Electrician",
    "HVAC",
    "Plumber",
    "Carpenter",
    "Concrete",
    "Construction Supervisor",
    "Driver",
    "Filler",
];

/// Returns the ordered question list for an occupation, or an empty slice.
pub fn questions_for(occupation: &str) -> &'static [&'static str] {
    match occupation {
        "Electrician" => &[
            "What experience do you have in commercial or residential electrical work?",
            "Do you hold an electrician's license or certification?",
            "What types of wiring systems or electrical panels have you worked with?",
            "Are you comfortable reading blueprints or electrical diagrams?",
            "What safety procedures do you typically follow on job sites?",
        ],
        "HVAC" => &[
            "What types of HVAC systems have you installed or serviced?",
            "Do you have an EPA certification or any relevant licenses?",
            "How do you usually troubleshoot issues with climate control systems?",
            "Have you worked with refrigerants or done any pipe brazing/soldering?",
            "How do you document your maintenance or installation work?",
        ],
        "Plumber" => &[
            "What types of plumbing work do you specialize in?",
            "Have you worked in residential, commercial, or industrial plumbing settings?",
            "Have you installed water heaters, pumps, or septic systems?",
            "What tools do you commonly use on the job?",
            "Have you done any demolition or replacement of old plumbing systems?",
        ],
        "Carpenter" => &[
            "What types of wood or building materials do you most commonly work with?",
            "Do you have experience framing, flooring, or roofing?",
            "What tools do you use for precision cuts and installations?",
            "Have you worked from blueprints or architectural plans before?",
            "How do you ensure accuracy and quality in your work?",
        ],
        "Concrete" => &[
            "What experience do you have with pouring foundations or concrete slabs?",
            "Have you worked with rebar installation or formwork?",
            "How do you ensure proper mixing and curing of concrete?",
            "Have you done grinding or finishing work on concrete surfaces?",
            "Are you comfortable working in extreme weather conditions?",
        ],
        "Construction Supervisor" => &[
            "How many workers have you supervised at one time?",
            "How do you manage scheduling and project timelines?",
            "Do you have experience working with subcontractors or clients directly?",
            "How do you handle conflicts or unexpected issues on site?",
            "What tools or software do you use for planning and documentation?",
        ],
        "Driver" => &[
            "What types of driver's licenses do you currently hold?",
            "What kind of vehicles have you driven, such as box trucks, vans, or others?",
            "Do you have experience with local delivery or long-distance driving?",
            "Are you available to work nights, weekends, or flexible hours?",
            "How do you maintain the condition and safety of your vehicle?",
        ],
        "Filler" => &[
            "What experience do you have with packing, sorting, or order fulfillment?",
            "Are you familiar with using handheld scanners or tablets on the job?",
            "Can you perform in a physically demanding warehouse environment?",
            "How do you stay accurate and efficient when filling large volumes of orders?",
            "Have you worked in warehouse, logistics, or production settings before?",
        ],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_supported_occupation_has_questions() {
        for occupation in SUPPORTED_OCCUPATIONS {
            let questions = questions_for(occupation);
            assert!(!questions.is_empty(), "{occupation} has no questions");
            assert!(questions.iter().all(|q| !q.trim().is_empty()));
        }
    }

    #[test]
    fn test_unknown_occupation_is_empty_not_error() {
        assert!(questions_for("Astronaut").is_empty());
        assert!(questions_for("").is_empty());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(!questions_for("HVAC").is_empty());
        assert!(questions_for("hvac").is_empty());
    }
}
