//! Fixed instruction templates. `{data}` is replaced by the rendered patient
//! document; the recommendation template also takes `{result}`, the text of a
//! prior evaluation.

pub const DATA_SLOT: &str = "{data}";
pub const RESULT_SLOT: &str = "{result}";

pub const EVALUATION: &str = r#"ROLE: You are a health analyst combining medical knowledge and statistical
expertise to evaluate personal wellbeing data and provide actionable insights.

=== INPUT ===
1. Baseline profile: age, sex, height, latest weight, medical history,
   family history, lifestyle factors.
2. Time series of daily records, oldest first: resting heart rate, HRV,
   sleep hours, steps, calories, SpO2, skin temperature deviation, body
   weight, illness symptoms, energy (0-10), muscle soreness (0-10),
   mood (0-10).

=== METHOD ===
- Compare the most recent records against the earlier ones and flag
  deviations above 15-20% in key metrics.
- Cross-reference metrics that decline together.
- Red flags: resting HR above 100 or below 40 bpm, SpO2 below 92% sustained,
  weight loss above 5% in 4 weeks, illness lasting more than 7 days, HRV drop
  above 30% sustained, sleep below 4 or above 12 hours.
- Consider recent illness, travel, medication and age-appropriate baselines.

=== SAFEGUARDS ===
- Never diagnose a specific medical condition.
- Always recommend professional consultation for concerning patterns.
- For emergency symptoms recommend urgent care immediately.
- This is monitoring support, not medical advice.

=== OUTPUT ===
Respond with ONE JSON object and nothing else, using exactly these keys:
{
  "STATUS": "NORMAL" or "CONSULT RECOMMENDED",
  "Evaluation_Period": "first date - last date",
  "Current_Status": "one friendly sentence",
  "What_We're_Seeing": "2-3 short paragraphs in plain language",
  "Key_Observations": {
    "Going_Well": ["..."],
    "Worth_Noting": ["..."],
    "Needs_Attention": ["..."]
  },
  "Recommendations": {
    "Immediate_Actions": ["..."],
    "Monitoring_Follow_up": ["..."],
    "Professional_Consultation": ["..."]
  },
  "When_to_Seek_Care": "clear criteria"
}

Now evaluate this patient:

{data}
"#;

pub const DISEASE_RISK: &str = r#"ROLE: You are a health risk analyst. Estimate disease risk from the data
below and say whether a doctor visit is needed. Be conservative: a few weeks
of data is short-term and must not dramatically move long-term risk.

=== ASSESS ===
- Type 2 diabetes (10-year risk): age baseline, family history, BMI,
  sustained low activity, poor sleep.
- Tuberculosis: exposure plus vulnerability; persistent cough with weight
  loss or fever is the main signal.
- Cardiovascular disease (10-year risk): age baseline, diabetes,
  hypertension, smoking, family history of early CVD, BMI, inactivity.
- Put vital sign trends in context. HRV naturally varies 20-30% day to day;
  SpO2 above 92% is normal.

=== DECIDE ===
- URGENT CARE NEEDED: any risk above 50% or emergency symptoms.
- DOCTOR CONSULTATION RECOMMENDED: elevated risk together with persistent
  symptoms or several uncontrolled risk factors.
- NEEDS MONITORING: mild elevation without symptoms; lifestyle first.
- NORMAL: all risks below 15%, stable metrics, no symptoms.

=== OUTPUT ===
Respond with ONE JSON object and nothing else:
{
  "Overall_Status": "NORMAL" | "NEEDS MONITORING" | "DOCTOR CONSULTATION RECOMMENDED" | "URGENT CARE NEEDED",
  "Risks": {
    "Type_2_Diabetes": {"percent": 0, "level": "low|moderate|high"},
    "Tuberculosis": {"percent": 0, "level": "low|moderate|high"},
    "Cardiovascular": {"percent": 0, "level": "low|moderate|high"}
  },
  "Main_Risk_Factors": ["..."],
  "Recent_Trends": ["..."],
  "Going_Well": ["..."],
  "Recommendation": "...",
  "Immediate_Actions": ["..."],
  "When_to_Seek_Urgent_Care": ["..."]
}

Patient data:

{data}
"#;

pub const RECOMMENDATION: &str = r#"=== GUIDELINES ===
- Conversational, reassuring language without medical jargon.
- Frame findings as observations, never diagnoses.
- Emphasize what the person can control.
- Make every suggestion specific and actionable.

Always include 3-5 zero-risk lifestyle suggestions personalised to the
metrics below, drawn from hydration, sleep, movement, stress management,
nutrition and recovery. Emphasize the areas where the data shows the most
room for improvement.

=== SAFEGUARDS ===
- Never diagnose a specific medical condition.
- Always recommend professional consultation for concerning patterns.
- Never suggest delaying care for serious symptoms.

Prior evaluation:
{result}

Patient data:
{data}

Output short, effective bullet points only. No greeting.
"#;

pub const QUICK_INSIGHT: &str = r#"Provide a brief 2-3 sentence friendly health insight based on today's data.
Focus on what's notable and give one actionable tip.

Today's metrics:
{data}
"#;

/// Substitute the patient document into a single-slot template.
pub fn render(template: &str, data: &str) -> String {
    template.replace(DATA_SLOT, data)
}

/// Substitute the evaluation text and the patient document. `{result}` is
/// replaced first so a `{data}` inside the evaluation text is left alone.
pub fn render_recommendation(evaluation_text: &str, data: &str) -> String {
    let (head, tail) = match RECOMMENDATION.split_once(RESULT_SLOT) {
        Some(parts) => parts,
        None => return render(RECOMMENDATION, data),
    };
    format!("{}{}{}", head.replace(DATA_SLOT, data), evaluation_text, tail.replace(DATA_SLOT, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_has_a_data_slot() {
        for template in [EVALUATION, DISEASE_RISK, RECOMMENDATION, QUICK_INSIGHT] {
            assert_eq!(template.matches(DATA_SLOT).count(), 1);
        }
        assert_eq!(RECOMMENDATION.matches(RESULT_SLOT).count(), 1);
    }

    #[test]
    fn recommendation_embeds_both_inputs() {
        let prompt = render_recommendation("STATUS: NORMAL", "| 1 | 2025-03-14 |");
        assert!(prompt.contains("Prior evaluation:\nSTATUS: NORMAL"));
        assert!(prompt.contains("| 1 | 2025-03-14 |"));
        assert!(!prompt.contains(DATA_SLOT));
        assert!(!prompt.contains(RESULT_SLOT));
    }

    #[test]
    fn slot_text_inside_the_evaluation_is_not_substituted() {
        let prompt = render_recommendation("model said {data}", "TABLE");
        assert!(prompt.contains("model said {data}"));
        assert_eq!(prompt.matches("TABLE").count(), 1);
    }
}
