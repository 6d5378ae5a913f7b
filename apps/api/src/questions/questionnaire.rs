//! Structured questionnaires rendered as a question/answer table in the report.
//!
//! Each question carries a `field_id` that matches a data-collection item
//! configured on the voice agent; the extracted value for that id fills the
//! answer column.

/// One question row in a questionnaire table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionField {
    pub field_id: &'static str,
    pub question: &'static str,
}

/// A titled group of questions. Rendered as a full-width category row.
#[derive(Debug, Clone, Copy)]
pub struct QuestionCategory {
    pub title: &'static str,
    pub questions: &'static [QuestionField],
}

const fn field(field_id: &'static str, question: &'static str) -> QuestionField {
    QuestionField { field_id, question }
}

/// Returns the structured questionnaire for an occupation, if one exists.
pub fn questionnaire_for(occupation: &str) -> Option<&'static [QuestionCategory]> {
    match occupation {
        "Electrician" => Some(ELECTRICIAN),
        _ => None,
    }
}

static ELECTRICIAN: &[QuestionCategory] = &[
    QuestionCategory {
        title: "Years of Experience",
        questions: &[
            field("years_experience_total", "How many total years have you worked as an electrician?"),
            field("years_experience_commercial", "How many years have you worked in commercial construction?"),
            field("years_experience_industrial", "How many years have you worked in industrial construction?"),
            field("years_experience_residential", "How many years have you worked in residential construction?"),
        ],
    },
    QuestionCategory {
        title: "Work Preference and Project Experience",
        questions: &[
            field("work_preference_reason", "What type of work do you prefer, commercial, industrial, or residential? Why?"),
            field("project_experience_commercial", "Have you worked on multi-story commercial buildings, office spaces, retail centers, or large-scale projects?"),
            field("project_experience_industrial", "Have you worked on factories, manufacturing plants, or heavy industrial sites?"),
        ],
    },
    QuestionCategory {
        title: "Tools & Licensing",
        questions: &[
            field("tools_owned", "Do you have your own hand tools for electrical work?"),
            field("license_status", "Do you have a state-issued, non-expired electrical license? (Journeyman, Master, or Apprentice?)"),
            field("tools_required", "Do you have the hand tools required to perform electrical work on commercial and industrial projects?"),
            field("ppe_ownership", "Do you have basic (unbranded) PPE? (Work Boots (Reg Steel Composite), Hard Hat, Safety Glasses, Safety Vest, Other)"),
        ],
    },
    QuestionCategory {
        title: "Commercial vs. Industrial vs. Residential Experience",
        questions: &[
            field("percentage_experience_commercial", "What percentage of your experience is in commercial work?"),
            field("percentage_experience_industrial", "What percentage of your experience is in industrial work?"),
            field("percentage_experience_residential", "What percentage of your experience is in residential work?"),
            field("recent_commercial_experience", "Have you recently done electrical work in commercial buildings (like schools, hospitals, or office spaces)?"),
            field("voltage_experience", "Have you worked in High-Voltage, Medium-Voltage, or Low-Voltage?"),
            field("residential_construction_type", "Have you worked in new residential construction or home remodels?"),
            field("peer_network_experience", "Do you know other electricians with 2 years of commercial and/or industrial experience?"),
        ],
    },
    QuestionCategory {
        title: "Work Requirements & Safety",
        questions: &[
            field("availability_start", "How soon could you start if a position were to become available?"),
            field("availability_hindrance", "Do you have any upcoming appointments that may hinder you from starting?"),
            field("pay_requirements", "What are your minimum hourly pay requirements?"),
            field("current_employment_reason", "Are you currently working? If yes, why are you looking for a new job?"),
            field("safety_certifications", "Do you have any safety training or certifications? (OSHA, Ariel Lift, etc.)"),
            field("lift_operation_experience", "Can you operate scissor lifts or boom lifts?"),
            field("overtime_availability", "Are you available for overtime or weekend work if needed?"),
            field("employment_identification", "Do you have the proper identification for employment?"),
            field("travel_availability", "Are you willing to travel if a per-diem is offered?"),
        ],
    },
    QuestionCategory {
        title: "Electrical Skills",
        questions: &[
            field("wire_pulling_experience", "Have you done wire pulling before? (Commercial, Industrial, or Residential?)"),
            field("conduit_installation_experience", "Have you installed electrical conduit in commercial or industrial buildings?"),
            field("conduit_bending_overview", "What types of conduit bending have you done, and on a scale of 1 (entry level) to 5 (advanced) how would you rate yourself?"),
            field("bend_90_rating", "- 90-degree bends (1-5)"),
            field("bend_45_rating", "- 45-degree bends (1-5)"),
            field("saddle_3_point_rating", "- 3-point saddles (used to go over obstacles) (1-5)"),
            field("saddle_4_point_rating", "- 4-point saddles (used for more complex offsets) (1-5)"),
            field("offsets_kicks_rating", "- Offsets and kicks (used for aligning conduit to electrical boxes) (1-5)"),
            field("conduit_bending_tools_used", "What tools have you used for bending conduits? And How would you rate yourself on a (1-5) scale?"),
            field("hand_benders_rating", "- Hand Benders (1-5)"),
            field("hydraulic_benders_rating", "- Hydraulic Benders (1-5)"),
            field("mechanical_benders_rating", "- Mechanical Benders (1-5)"),
            field("conduit_type_experience", "Do you have experience with the following types of conduit? (EMT) (GRC) (RMC) (RNC) (PVC)"),
            field("fixture_work_experience", "Have you installed or worked on:"),
            field("light_fixture_installation", "- Commercial Light Fixture Installation?"),
            field("industrial_lighting_controls", "- Industrial Lighting or Motor Controls?"),
            field("lighting_electrical_panels", "- Commercial Lighting and Electrical Panels?"),
            field("switchgear_transformers_experience", "- Switchgear & transformers (Commercial or Industrial settings)?"),
            field("nec_knowledge_rating", "How would you rate your NEC | National Electrical Code Knowledge? 1 (entry level) to 5 (advanced)"),
            field("lockout_tagout_experience", "Are you experienced with Lock Out Tag Out Procedures?"),
        ],
    },
    QuestionCategory {
        title: "Blueprint Reading & Layouts",
        questions: &[
            field("blueprint_experience", "Have you worked with commercial electrical blueprints?"),
            field("blueprint_skills_rating", "On a scale of 1 (entry level) to 5 (advanced), how would you rate your blueprint reading/interpretation skills?"),
            field("blueprint_usage_summary", "Have you used blueprints to:"),
            field("blueprint_panel_layout", "- Identify panel locations and circuit layouts?"),
            field("blueprint_conduit_wire", "- Find conduit runs and wire sizing?"),
            field("blueprint_power_distribution", "- Plan power distribution for buildings?"),
            field("blueprint_conduit_layout", "- Layout conduit before installation?"),
            field("blueprint_one_line", "- Review one-line diagrams (showing how power flows in a building)?"),
            field("blueprint_legend_symbols", "- Understand legend and symbol key in a blueprint?"),
            field("blueprint_as_built", "Have you worked with as-built drawings (blueprints that show final electrical work after installation)?"),
        ],
    },
    QuestionCategory {
        title: "New Construction, Remodeling & Demolition",
        questions: &[
            field("new_construction_experience", "Have you worked on new commercial buildings from the ground up?"),
            field("remodeling_experience", "Have you done remodeling work, like upgrading electrical systems in existing buildings?"),
            field("demolition_experience", "Have you worked on demolition projects where you had to safely remove old wiring?"),
        ],
    },
    QuestionCategory {
        title: "Industry Experience",
        questions: &[
            field("industry_office_highrise", "Office /High Rise Buildings"),
            field("industry_hospitals", "Hospitals Or Medical Centers"),
            field("industry_hotels", "Hotels Or Resorts"),
            field("industry_retail", "Retail Stores Or Malls"),
            field("industry_stadiums", "Stadiums Or Casinos"),
            field("industry_airports", "Airports Or Transportation Hubs"),
            field("industry_apartments", "Apartment Buildings or Condominiums"),
        ],
    },
    QuestionCategory {
        title: "Other Information",
        questions: &[
            field("applicant_name", "Applicant Name:"),
            field("contact_date", "Contact Date:"),
        ],
    },
];
