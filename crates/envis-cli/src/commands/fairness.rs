//! Fairness calculator command

use anyhow::Result;
use envis_core::{calculate, seed, FairnessData, PartnerData};

use super::{format_money, Session};
use crate::cli::PartnerArg;

fn partner_from_arg(arg: &PartnerArg, default_hourly_value: f64) -> PartnerData {
    PartnerData::new(
        arg.name.clone(),
        arg.gross_income,
        arg.unpaid_hours,
        arg.hourly_value.unwrap_or(default_hourly_value),
    )
}

/// Compute ratios for the given partners, falling back to the stored inputs
pub fn fairness_for(
    session: &Session,
    partner1: Option<&PartnerArg>,
    partner2: Option<&PartnerArg>,
) -> FairnessData {
    let settings = &session.config.fairness;
    let (stored1, stored2) = match &session.household.fairness {
        Some(data) => (data.partner1.clone(), data.partner2.clone()),
        None => seed::partners(settings),
    };

    let p1 = partner1
        .map(|arg| partner_from_arg(arg, settings.default_hourly_value))
        .unwrap_or(stored1);
    let p2 = partner2
        .map(|arg| partner_from_arg(arg, settings.default_hourly_value))
        .unwrap_or(stored2);

    calculate(p1, p2, settings.weeks_per_year)
}

pub fn cmd_fairness(
    session: &mut Session,
    partner1: Option<&PartnerArg>,
    partner2: Option<&PartnerArg>,
    save: bool,
) -> Result<()> {
    let weeks = session.config.fairness.weeks_per_year;
    let data = fairness_for(session, partner1, partner2);

    println!();
    println!("⚖️  Fairness Calculator");
    println!("   ─────────────────────────────────────────────────────────────");
    for partner in [&data.partner1, &data.partner2] {
        println!(
            "   {:<10} income {:>12}  unpaid {:>4}h/wk × {}/h = {:>12} virtual",
            partner.name,
            format_money(partner.gross_income),
            partner.unpaid_hours,
            format_money(partner.hourly_value),
            format_money(partner.virtual_income(weeks))
        );
    }
    println!();
    println!(
        "   Income only:        {} {}% / {} {}%",
        data.partner1.name, data.before_ratio[0], data.partner2.name, data.before_ratio[1]
    );
    println!(
        "   With unpaid labour: {} {}% / {} {}%",
        data.partner1.name, data.after_ratio[0], data.partner2.name, data.after_ratio[1]
    );
    if let Some(summary) = data.summary() {
        println!();
        println!("   {}", summary);
    }

    if save {
        session.household.fairness = Some(data);
        session.save()?;
        println!();
        println!("✅ Saved fairness ratios");
    }

    println!();
    Ok(())
}
