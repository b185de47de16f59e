//! Static route catalog backing the `/api` introspection endpoints.
//!
//! The catalog is a table maintained next to the route definitions; keep
//! the two in sync when adding routes. It is a debugging aid, not a stable
//! contract. Source text is not served.

use serde::Serialize;

/// One registered route, as exposed by `GET /api`.
#[derive(Debug, Clone, Serialize)]
pub struct RouteInfo {
    pub path: &'static str,
    pub methods: &'static [&'static str],
    pub params: &'static [&'static str],
    pub doc: &'static str,
}

/// All registered routes, in the order they are mounted.
pub const ROUTES: &[RouteInfo] = &[
    RouteInfo {
        path: "/health",
        methods: &["GET"],
        params: &[],
        doc: "Service and job queue broker health.",
    },
    RouteInfo {
        path: "/workspaces",
        methods: &["GET"],
        params: &[],
        doc: "Retrieve a list of all workspaces.",
    },
    RouteInfo {
        path: "/workspace/{name}",
        methods: &["POST", "DELETE"],
        params: &["name"],
        doc: "Create a new workspace (idempotent), or delete an empty one.",
    },
    RouteInfo {
        path: "/workspace/{name}/files",
        methods: &["GET"],
        params: &["name"],
        doc: "List all files in a workspace.",
    },
    RouteInfo {
        path: "/workspace/{name}/view/{file}",
        methods: &["GET"],
        params: &["name", "file"],
        doc: "Stream the content of a file in a workspace.",
    },
    RouteInfo {
        path: "/workspace/{name}/create/{file}",
        methods: &["POST"],
        params: &["name", "file"],
        doc: "Create or update a file in a workspace from a literal string body.",
    },
    RouteInfo {
        path: "/workspace/{name}/upload",
        methods: &["POST"],
        params: &["name"],
        doc: "Upload a file to a workspace (multipart).",
    },
    RouteInfo {
        path: "/workspace/{name}/execute/{script}",
        methods: &["POST"],
        params: &["name", "script"],
        doc: "Enqueue whole-script execution of a script in a workspace. Returns a job id.",
    },
    RouteInfo {
        path: "/workspace/{name}/execute/{script}/{function}",
        methods: &["POST"],
        params: &["name", "script", "function"],
        doc: "Enqueue execution of a named function from a script. Returns a job id.",
    },
    RouteInfo {
        path: "/execution/{job_id}/status",
        methods: &["GET"],
        params: &["job_id"],
        doc: "Check the status of an enqueued job and its result if finished.",
    },
    RouteInfo {
        path: "/api",
        methods: &["GET"],
        params: &[],
        doc: "List registered routes, optionally filtered with ?search=.",
    },
    RouteInfo {
        path: "/api/{endpoint}",
        methods: &["GET"],
        params: &["endpoint"],
        doc: "List registered routes whose path contains the given fragment.",
    },
    RouteInfo {
        path: "/queue",
        methods: &["GET"],
        params: &[],
        doc: "Read-only queue dashboard: per-status counts and recent jobs.",
    },
];

/// Routes matching the search query against path or doc text. An empty
/// query returns all routes.
pub fn search(query: Option<&str>) -> Vec<&'static RouteInfo> {
    match query {
        None | Some("") => ROUTES.iter().collect(),
        Some(q) => ROUTES
            .iter()
            .filter(|r| r.path.contains(q) || r.doc.contains(q))
            .collect(),
    }
}

/// Routes whose path contains the given fragment.
pub fn by_path_fragment(fragment: &str) -> Vec<&'static RouteInfo> {
    ROUTES.iter().filter(|r| r.path.contains(fragment)).collect()
}
