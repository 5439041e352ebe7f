use codesearch_client::CodeWindowLoader;
use codesearch_client::JobSnapshot;
use codesearch_client::TreeNode;
use codesearch_protocol::JobState;
use codesearch_protocol::matched_field_label;
use owo_colors::OwoColorize;

pub(crate) fn print_tree(nodes: &[TreeNode]) {
    print_level(nodes, 0);
}

fn print_level(nodes: &[TreeNode], depth: usize) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match node {
            TreeNode::Folder(folder) => {
                println!("{indent}{}/", folder.label.bright_blue());
                print_level(&folder.children, depth + 1);
            }
            TreeNode::File(file) => {
                let badge = format!(
                    "[{} | {}]",
                    file.match_type.label(),
                    matched_field_label(&file.matched_field)
                );
                println!("{indent}{}  {}", file.label, badge.dimmed());
            }
        }
    }
}

pub(crate) fn print_window(loader: &CodeWindowLoader, step: u32) {
    let window = loader.window();
    println!("{}", loader.file_path().bold());
    if loader.error().is_some() || window.window_from > 1 {
        let hint = if loader.can_expand_up() {
            format!("  ({})", loader.expand_up_hint(step))
        } else {
            String::new()
        };
        println!("{}{}", loader.upper_caption().cyan(), hint.dimmed());
    }
    for line in loader.rendered_lines() {
        let number = format!("{:>5}", line.number);
        if line.matched {
            println!("{} {} {}", number.green(), ">".green(), line.text);
        } else {
            println!("{}   {}", number.dimmed(), line.text);
        }
    }
    if loader.error().is_some() || loader.can_expand_down() {
        println!(
            "{}{}",
            loader.lower_caption().cyan(),
            format!("  ({})", loader.expand_down_hint(step)).dimmed()
        );
    }
    println!();
}

pub(crate) fn print_job_progress(kind: &str, snap: &JobSnapshot) {
    let status = &snap.status;
    let metrics = snap.metrics();
    let mut line = format!(
        "{kind}: {} {:.0}% {} (elapsed {})",
        status.state, status.progress, status.message, metrics.elapsed_label()
    );
    if let Some(remaining) = metrics.remaining_label() {
        line.push_str(&format!(", ~{remaining} left"));
    }
    match status.state {
        JobState::Completed => println!("{}", line.bright_green()),
        JobState::Failed => println!("{}", line.bright_red()),
        JobState::Running | JobState::Idle => println!("{line}"),
    }
}
