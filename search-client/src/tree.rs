//! Folder/file navigation tree built from a flat list of search hits.

use codesearch_protocol::MatchResult;
use codesearch_protocol::MatchType;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Folder(FolderNode),
    File(FileNode),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FolderNode {
    pub label: String,
    pub children: Vec<TreeNode>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileNode {
    pub label: String,
    /// The originating hit's `file_path`; unique across the tree.
    pub id: String,
    pub match_type: MatchType,
    pub matched_field: String,
}

impl TreeNode {
    pub fn label(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.label,
            Self::File(file) => &file.label,
        }
    }

    /// File ids in depth-first order.
    pub fn file_ids(nodes: &[TreeNode]) -> Vec<&str> {
        let mut ids = Vec::new();
        collect_ids(nodes, &mut ids);
        ids
    }
}

fn collect_ids<'a>(nodes: &'a [TreeNode], ids: &mut Vec<&'a str>) {
    for node in nodes {
        match node {
            TreeNode::Folder(folder) => collect_ids(&folder.children, ids),
            TreeNode::File(file) => ids.push(&file.id),
        }
    }
}

impl FolderNode {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            children: Vec::new(),
        }
    }
}

/// Build the navigation tree for `matches`. Children keep the order in which
/// they first appear in the input.
pub fn build_tree(matches: &[MatchResult]) -> Vec<TreeNode> {
    let mut roots = Vec::new();
    for hit in matches {
        let path = hit.file_path();
        let segments: Vec<&str> = path.split('/').collect();
        let Some((file_label, folders)) = segments.split_last() else {
            continue;
        };
        let file = FileNode {
            label: (*file_label).to_string(),
            id: path.to_string(),
            match_type: hit.match_type_or_default(),
            matched_field: hit.matched_field_or_default().to_string(),
        };
        insert_file(&mut roots, folders, file);
    }
    compress(roots)
}

// Folders are matched by label among their siblings; the first match wins.
fn insert_file(level: &mut Vec<TreeNode>, folders: &[&str], file: FileNode) {
    let Some((head, rest)) = folders.split_first() else {
        let duplicate = level
            .iter()
            .any(|node| matches!(node, TreeNode::File(existing) if existing.id == file.id));
        if !duplicate {
            level.push(TreeNode::File(file));
        }
        return;
    };
    for node in level.iter_mut() {
        if let TreeNode::Folder(folder) = node
            && folder.label == *head
        {
            insert_file(&mut folder.children, rest, file);
            return;
        }
    }
    let mut folder = FolderNode::new(head);
    insert_file(&mut folder.children, rest, file);
    level.push(TreeNode::Folder(folder));
}

/// Collapse every folder whose only child is another folder into a single
/// node labelled `parent/child`. Running it twice changes nothing.
pub fn compress(nodes: Vec<TreeNode>) -> Vec<TreeNode> {
    nodes.into_iter().map(compress_node).collect()
}

fn compress_node(node: TreeNode) -> TreeNode {
    let TreeNode::Folder(mut folder) = node else {
        return node;
    };
    while folder.children.len() == 1 {
        match folder.children.pop() {
            Some(TreeNode::Folder(child)) => {
                folder.label = format!("{}/{}", folder.label, child.label);
                folder.children = child.children;
            }
            Some(file) => {
                folder.children.push(file);
                break;
            }
            None => break,
        }
    }
    folder.children = compress(folder.children);
    TreeNode::Folder(folder)
}
