use colored::Colorize;
use guardian_core::session::Plan;
use strum::IntoEnumIterator;

/// Plan picker shown whenever no session exists.
pub fn render() -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "🛡  Myers Guardian AI".bright_magenta().bold()));
    out.push_str(&format!(
        "{}\n\n",
        "Human oversight for every automated decision.".dimmed()
    ));

    for plan in Plan::iter() {
        let name = if plan == Plan::Enterprise {
            plan.display_name().yellow().bold()
        } else {
            plan.display_name().bold()
        };
        out.push_str(&format!("  {}  {}\n", name, plan.price().green()));
        for feature in plan.features() {
            out.push_str(&format!("    • {feature}\n"));
        }
        out.push_str(&format!(
            "    {}\n\n",
            format!("guardian login --plan {plan}").cyan()
        ));
    }

    out.push_str(&format!(
        "{}\n",
        "Have an account? guardian login --email <email> --password <password>".dimmed()
    ));
    out.push_str(&format!(
        "{}\n",
        "SOC2 Compliant · 256-bit Encryption · Deployed in 4 Regions".dimmed()
    ));
    out
}
