//! Message sequence charts of a simulation run.
//!
//! See: http://www.mcternan.me.uk/mscgen/
use crate::simulation::RoundReport;
use crate::snapshot::SimulationView;

pub fn generate_msc(view: &SimulationView, reports: &[RoundReport]) -> String {
    let mut msc = String::from("msc {\n  hscale = \"2\";\n\n");

    let generals = view
        .participants
        .iter()
        .map(|p| {
            let role = if p.is_sender && p.is_faulty {
                " (sender, faulty)"
            } else if p.is_sender {
                " (sender)"
            } else if p.is_faulty {
                " (faulty)"
            } else {
                ""
            };
            format!("g{} [ label=\"{}{}\" ]", p.id, p.id, role)
        })
        .collect::<Vec<_>>()
        .join(",\n  ");
    msc.push_str("  ");
    msc.push_str(&generals);
    msc.push_str(";\n");

    for report in reports {
        msc.push_str(&format!("  --- [ label=\"round {}\" ];\n", report.round));
        for msg in report.messages.iter() {
            msc.push_str(&format!(
                "  g{} -> g{} [ label=\"{}: {}\" ];\n",
                msg.sender, msg.recipient, msg.path, msg.value
            ));
        }
    }

    let decisions = view
        .participants
        .iter()
        .filter_map(|p| p.final_decision.map(|d| format!("g{} box g{} [ label=\"{}\" ]", p.id, p.id, d)))
        .collect::<Vec<_>>();
    if !decisions.is_empty() {
        msc.push_str("  --- [ label=\"decisions\" ];\n  ");
        msc.push_str(&decisions.join(",\n  "));
        msc.push_str(";\n");
    }

    msc.push_str("}\n");
    msc
}
