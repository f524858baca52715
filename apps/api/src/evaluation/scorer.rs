//! One batched call classifies every requirement of every skill group.
//!
//! Model output is reconciled against the requested groups so that each group's
//! satisfied and unsatisfied lists partition exactly its requested requirements:
//! fabricated entries are dropped and unclassified ones count as unsatisfied.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::evaluation::prompts::MULTI_ALIGNMENT_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{schema_section, to_prompt_json};
use crate::llm_client::{LlmClient, Tier};
use crate::models::alignment::{AlignmentBatch, AlignmentResult, GroupAlignment};
use crate::models::job::{JobRequirements, JobRequirementsV2};
use crate::models::resume::Resume;

/// A skill group as sent to the model: the requested name and its non-blank
/// requirements, both spelled exactly as in the job record.
#[derive(Debug, Clone, Serialize)]
struct RequestedGroup {
    group_name: String,
    requirements: Vec<String>,
}

/// Case- and whitespace-insensitive comparison key.
fn match_key(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches('.')
        .to_lowercase()
}

/// Groups in request order. Groups with an identical name are merged and
/// identical requirements listed once.
fn requested_groups(job: &JobRequirementsV2) -> Vec<RequestedGroup> {
    let mut groups: Vec<RequestedGroup> = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for group in &job.required_skills {
        let index = *seen.entry(group.group_name.as_str()).or_insert_with(|| {
            groups.push(RequestedGroup {
                group_name: group.group_name.clone(),
                requirements: Vec::new(),
            });
            groups.len() - 1
        });

        for requirement in group.listed_requirements() {
            if !groups[index].requirements.contains(&requirement) {
                groups[index].requirements.push(requirement);
            }
        }
    }
    groups
}

/// Index of `names` by `match_key`.
fn key_index(names: &[String]) -> HashMap<String, Vec<usize>> {
    let mut index: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, name) in names.iter().enumerate() {
        index.entry(match_key(name)).or_default().push(i);
    }
    index
}

/// Positions in `names` a model-supplied string refers to. An exact spelling
/// wins; otherwise every entry sharing its match key.
fn resolve(names: &[String], index: &HashMap<String, Vec<usize>>, claimed: &str) -> Vec<usize> {
    let Some(found) = index.get(&match_key(claimed)) else {
        return Vec::new();
    };
    let exact: Vec<usize> = found
        .iter()
        .copied()
        .filter(|&i| names[i] == claimed)
        .collect();
    if exact.is_empty() {
        found.clone()
    } else {
        exact
    }
}

pub async fn score_alignment(
    llm: &LlmClient,
    resume: &Resume,
    job: &JobRequirements,
    job_v2: &JobRequirementsV2,
) -> Result<AlignmentResult, AppError> {
    let groups = requested_groups(job_v2);

    // Groups with nothing to evaluate are vacuously satisfied and never sent.
    let mut result: BTreeMap<String, GroupAlignment> = groups
        .iter()
        .filter(|g| g.requirements.is_empty())
        .map(|g| (g.group_name.clone(), GroupAlignment::default()))
        .collect();

    let evaluable: Vec<RequestedGroup> = groups
        .into_iter()
        .filter(|g| !g.requirements.is_empty())
        .collect();

    if evaluable.is_empty() {
        info!(groups = result.len(), "no requirements to score; skipping generation");
        return Ok(AlignmentResult(result));
    }

    info!(
        groups = evaluable.len(),
        requirements = evaluable.iter().map(|g| g.requirements.len()).sum::<usize>(),
        "scoring alignment"
    );

    let prompt = MULTI_ALIGNMENT_PROMPT_TEMPLATE
        .replace("{format_instructions}", &schema_section::<AlignmentBatch>())
        .replace("{job_json}", &to_prompt_json(job)?)
        .replace("{all_skill_groups}", &to_prompt_json(&evaluable)?)
        .replace("{resume_json}", &to_prompt_json(resume)?);

    let batch: AlignmentBatch = llm
        .generate_record(&prompt, Tier::Primary, "score_alignment")
        .await?;

    result.extend(reconcile(&evaluable, batch));

    let satisfied: usize = result.values().map(|g| g.satisfied_requirements.len()).sum();
    let unsatisfied: usize = result.values().map(|g| g.unsatisfied_requirements.len()).sum();
    info!(satisfied, unsatisfied, "alignment scored");
    Ok(AlignmentResult(result))
}

/// Maps decoded scores back onto the requested groups and requirement spellings.
fn reconcile(
    groups: &[RequestedGroup],
    batch: AlignmentBatch,
) -> BTreeMap<String, GroupAlignment> {
    let group_names: Vec<String> = groups.iter().map(|g| g.group_name.clone()).collect();
    let group_index = key_index(&group_names);
    let requirement_index: Vec<HashMap<String, Vec<usize>>> = groups
        .iter()
        .map(|g| key_index(&g.requirements))
        .collect();

    let mut satisfied: Vec<HashSet<usize>> = vec![HashSet::new(); groups.len()];
    let mut unsatisfied: Vec<HashSet<usize>> = vec![HashSet::new(); groups.len()];
    let mut reported: Vec<bool> = vec![false; groups.len()];

    for score in batch.alignment_scores {
        let targets = resolve(&group_names, &group_index, &score.group_name);
        if targets.is_empty() {
            warn!(group = %score.group_name, "dropping score for a group that was not requested");
            continue;
        }

        for g in targets {
            reported[g] = true;
            for (claimed, target) in [
                (&score.satisfied_requirements, &mut satisfied[g]),
                (&score.unsatisfied_requirements, &mut unsatisfied[g]),
            ] {
                for requirement in claimed {
                    let found = resolve(&groups[g].requirements, &requirement_index[g], requirement);
                    if found.is_empty() {
                        warn!(
                            group = %groups[g].group_name,
                            requirement = %requirement,
                            "dropping requirement that was not requested"
                        );
                    }
                    target.extend(found);
                }
            }
        }
    }

    groups
        .iter()
        .enumerate()
        .map(|(g, group)| {
            if !reported[g] {
                warn!(group = %group.group_name, "model omitted group; marking all requirements unsatisfied");
            }

            let mut alignment = GroupAlignment::default();
            let mut unclassified = 0usize;
            for (r, requirement) in group.requirements.iter().enumerate() {
                if satisfied[g].contains(&r) {
                    alignment.satisfied_requirements.push(requirement.clone());
                } else {
                    if !unsatisfied[g].contains(&r) {
                        unclassified += 1;
                    }
                    alignment.unsatisfied_requirements.push(requirement.clone());
                }
            }
            if reported[g] && unclassified > 0 {
                warn!(group = %group.group_name, unclassified, "unclassified requirements marked unsatisfied");
            }
            (group.group_name.clone(), alignment)
        })
        .collect()
}
