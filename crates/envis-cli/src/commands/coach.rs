//! Coach and pathway commands

use anyhow::Result;
use envis_core::coach::{pathway_progress, toggle_step};
use envis_core::{seed, Topic};

use super::Session;

pub fn cmd_coach(session: &Session, goal_id: &str, topic: &str) -> Result<()> {
    let topic: Topic = topic.parse()?;
    let goal = session.household.goals.require(goal_id)?;
    let reply = seed::coach_script().reply(&goal.id, topic)?;

    println!();
    println!("💬 Coach on {} ({})", goal.name, reply.topic);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {}", reply.message);
    println!();
    Ok(())
}

pub fn cmd_pathway_list(session: &Session) -> Result<()> {
    let steps = &session.household.pathway;
    let (done, total) = pathway_progress(steps);

    println!();
    println!("✅ A Pathway to Consider ({}/{} done)", done, total);
    println!("   ─────────────────────────────────────────────────────────────");
    for step in steps {
        let mark = if step.completed { "[x]" } else { "[ ]" };
        println!("   {} {}. {}", mark, step.id, step.step);
        println!("          {}", step.description);
    }
    println!();
    Ok(())
}

pub fn cmd_pathway_toggle(session: &mut Session, id: &str) -> Result<()> {
    session.household.pathway = toggle_step(&session.household.pathway, id)?;
    session.save()?;

    if let Some(step) = session.household.pathway.iter().find(|s| s.id == id) {
        let state = if step.completed { "done" } else { "not done" };
        println!("✅ Marked '{}' as {}", step.step, state);
    }
    Ok(())
}
