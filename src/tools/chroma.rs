//! Chroma tools the bridge knows by name.
//!
//! Tools: chroma_list_collections, chroma_create_collection,
//! chroma_get_collection, chroma_delete_collection, chroma_count_collection,
//! chroma_add_documents, chroma_query_collection, chroma_update_documents,
//! chroma_delete_documents

use crate::schema;
use crate::tools::ToolDef;

/// The baseline collection and document operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChromaTool {
    /// List all collections.
    ListCollections,
    /// Create a collection.
    CreateCollection,
    /// Describe one collection.
    GetCollection,
    /// Drop a collection.
    DeleteCollection,
    /// Count documents in a collection.
    CountCollection,
    /// Insert documents.
    AddDocuments,
    /// Similarity query.
    QueryCollection,
    /// Update documents by id.
    UpdateDocuments,
    /// Delete documents by id or filter.
    DeleteDocuments,
}

impl ChromaTool {
    /// Every known tool, in catalog order.
    pub const ALL: [ChromaTool; 9] = [
        ChromaTool::ListCollections,
        ChromaTool::CreateCollection,
        ChromaTool::GetCollection,
        ChromaTool::DeleteCollection,
        ChromaTool::AddDocuments,
        ChromaTool::QueryCollection,
        ChromaTool::UpdateDocuments,
        ChromaTool::DeleteDocuments,
        ChromaTool::CountCollection,
    ];

    /// Wire name of the tool.
    pub fn name(self) -> &'static str {
        match self {
            ChromaTool::ListCollections => "chroma_list_collections",
            ChromaTool::CreateCollection => "chroma_create_collection",
            ChromaTool::GetCollection => "chroma_get_collection",
            ChromaTool::DeleteCollection => "chroma_delete_collection",
            ChromaTool::CountCollection => "chroma_count_collection",
            ChromaTool::AddDocuments => "chroma_add_documents",
            ChromaTool::QueryCollection => "chroma_query_collection",
            ChromaTool::UpdateDocuments => "chroma_update_documents",
            ChromaTool::DeleteDocuments => "chroma_delete_documents",
        }
    }

    /// Look a tool up by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Catalog entry for this tool.
    pub fn definition(self) -> ToolDef {
        match self {
            ChromaTool::ListCollections => ToolDef::new(
                self.name(),
                "List all collections in ChromaDB",
                schema!(object {}),
            ),
            ChromaTool::CreateCollection => ToolDef::new(
                self.name(),
                "Create a new collection in ChromaDB",
                schema!(object {
                    required: { "collection_name": string },
                    optional: { "embedding_function_name": string, "metadata": object }
                }),
            ),
            ChromaTool::GetCollection => ToolDef::new(
                self.name(),
                "Get details about a specific collection",
                schema!(object {
                    required: { "collection_name": string }
                }),
            ),
            ChromaTool::DeleteCollection => ToolDef::new(
                self.name(),
                "Delete a collection from ChromaDB",
                schema!(object {
                    required: { "collection_name": string }
                }),
            ),
            ChromaTool::CountCollection => ToolDef::new(
                self.name(),
                "Count documents in a collection",
                schema!(object {
                    required: { "collection_name": string }
                }),
            ),
            ChromaTool::AddDocuments => ToolDef::new(
                self.name(),
                "Add documents to a collection",
                schema!(object {
                    required: { "collection_name": string, "documents": array_string },
                    optional: { "ids": array_string, "metadatas": array_object }
                }),
            ),
            ChromaTool::QueryCollection => ToolDef::new(
                self.name(),
                "Query documents in a collection",
                schema!(object {
                    required: { "collection_name": string, "query_texts": array_string },
                    optional: { "n_results": integer, "where": object, "where_document": object }
                }),
            ),
            ChromaTool::UpdateDocuments => ToolDef::new(
                self.name(),
                "Update documents in a collection",
                schema!(object {
                    required: { "collection_name": string, "ids": array_string },
                    optional: { "documents": array_string, "metadatas": array_object }
                }),
            ),
            ChromaTool::DeleteDocuments => ToolDef::new(
                self.name(),
                "Delete documents from a collection",
                schema!(object {
                    required: { "collection_name": string },
                    optional: { "ids": array_string, "where": object }
                }),
            ),
        }
    }
}

/// Get the fallback tool definitions.
pub fn tools() -> Vec<ToolDef> {
    ChromaTool::ALL.into_iter().map(ChromaTool::definition).collect()
}
