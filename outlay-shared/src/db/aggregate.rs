//! Project-details aggregation
//!
//! Assembles the read-only "project details" view out of three
//! independently stored collections in a single server-side pipeline:
//!
//! 1. `$match` exactly one project by ID
//! 2. `$lookup` (left outer) its expenses by `project_id`
//! 3. sort the joined expense array descending by date
//! 4. `$lookup` (left outer) its members by `project_id`
//! 5. `$project` the project scalars, `$filter`-ing expenses to the date
//!    window and members to the requested active state
//!
//! Both step-5 predicates run inside the shaping stage, so the server only
//! ships the post-filter arrays; never pull the full join client-side and
//! filter in memory. Stage order matters: the sort must land between the
//! two lookups so the embedded expense order is deterministic regardless
//! of storage order.

use crate::db::DbError;
use crate::models::{Expense, Project, ProjectDetails, ProjectMember};
use crate::query::filter::DetailsSelector;
use bson::oid::ObjectId;
use bson::{doc, from_document, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use tracing::debug;

use crate::db::repository::Persist;

/// Composes and runs the project-details pipeline.
pub struct ProjectDetailsAggregator {
    projects: Collection<Document>,
}

impl ProjectDetailsAggregator {
    /// Creates an aggregator rooted at the projects collection.
    pub fn new(database: &Database) -> Self {
        Self {
            projects: database.collection(Project::COLLECTION),
        }
    }

    /// Builds the five-stage pipeline. Pure; exposed for inspection.
    pub fn pipeline(project_id: ObjectId, selector: &DetailsSelector) -> Vec<Document> {
        let start = bson::DateTime::from_chrono(selector.window.start);
        let end = bson::DateTime::from_chrono(selector.window.end);

        vec![
            doc! { "$match": { "_id": project_id } },
            doc! { "$lookup": {
                "from": Expense::COLLECTION,
                "localField": "_id",
                "foreignField": "project_id",
                "as": "expenses",
            }},
            // $sortArray orders the embedded array itself; a root-level
            // $sort here would reorder the (single) project document and
            // leave the expenses in storage order.
            doc! { "$set": {
                "expenses": { "$sortArray": {
                    "input": "$expenses",
                    "sortBy": { "date": -1 },
                }},
            }},
            doc! { "$lookup": {
                "from": ProjectMember::COLLECTION,
                "localField": "_id",
                "foreignField": "project_id",
                "as": "members",
            }},
            doc! { "$project": {
                "_id": 1,
                "title": 1,
                "description": 1,
                "created_at": 1,
                "updated_at": 1,
                "expenses": { "$filter": {
                    "input": "$expenses",
                    "as": "expense",
                    "cond": { "$and": [
                        { "$gte": ["$$expense.date", start] },
                        { "$lt": ["$$expense.date", end] },
                    ]},
                }},
                "members": { "$filter": {
                    "input": "$members",
                    "as": "member",
                    "cond": { "$eq": ["$$member.is_active", selector.active_only] },
                }},
            }},
        ]
    }

    /// Looks up the assembled details document for one project.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] when no project has the given ID. A project
    /// with no expenses or members in range is not an error; it comes back
    /// with empty arrays.
    pub async fn lookup(
        &self,
        project_id: ObjectId,
        selector: &DetailsSelector,
    ) -> Result<ProjectDetails, DbError> {
        debug!(%project_id, ?selector, "aggregating project details");

        let pipeline = Self::pipeline(project_id, selector);
        let mut cursor = self.projects.aggregate(pipeline).await?;

        match cursor.try_next().await? {
            Some(document) => {
                from_document(document).map_err(|err| DbError::Decode(err.to_string()))
            }
            None => Err(DbError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::DateWindow;
    use chrono::{TimeZone, Utc};

    fn selector() -> DetailsSelector {
        DetailsSelector {
            window: DateWindow {
                start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            },
            active_only: true,
        }
    }

    fn stage_name(stage: &Document) -> &str {
        stage.keys().next().map(String::as_str).unwrap_or("")
    }

    #[test]
    fn pipeline_stages_are_ordered() {
        let pipeline = ProjectDetailsAggregator::pipeline(ObjectId::new(), &selector());
        let names: Vec<&str> = pipeline.iter().map(stage_name).collect();
        assert_eq!(
            names,
            vec!["$match", "$lookup", "$set", "$lookup", "$project"]
        );
    }

    #[test]
    fn match_stage_selects_the_project_by_id() {
        let id = ObjectId::new();
        let pipeline = ProjectDetailsAggregator::pipeline(id, &selector());
        let matched = pipeline[0].get_document("$match").unwrap();
        assert_eq!(matched.get_object_id("_id").unwrap(), id);
    }

    #[test]
    fn lookups_join_on_project_id() {
        let pipeline = ProjectDetailsAggregator::pipeline(ObjectId::new(), &selector());

        let expenses = pipeline[1].get_document("$lookup").unwrap();
        assert_eq!(expenses.get_str("from").unwrap(), "expenses");
        assert_eq!(expenses.get_str("localField").unwrap(), "_id");
        assert_eq!(expenses.get_str("foreignField").unwrap(), "project_id");
        assert_eq!(expenses.get_str("as").unwrap(), "expenses");

        let members = pipeline[3].get_document("$lookup").unwrap();
        assert_eq!(members.get_str("from").unwrap(), "projectMembers");
        assert_eq!(members.get_str("as").unwrap(), "members");
    }

    #[test]
    fn expense_array_is_sorted_descending_between_the_lookups() {
        let pipeline = ProjectDetailsAggregator::pipeline(ObjectId::new(), &selector());
        let sort = pipeline[2]
            .get_document("$set")
            .unwrap()
            .get_document("expenses")
            .unwrap()
            .get_document("$sortArray")
            .unwrap();
        assert_eq!(sort.get_str("input").unwrap(), "$expenses");
        assert_eq!(
            sort.get_document("sortBy").unwrap().get_i32("date").unwrap(),
            -1
        );
    }

    #[test]
    fn shaping_stage_applies_the_window_inside_the_join() {
        let sel = selector();
        let pipeline = ProjectDetailsAggregator::pipeline(ObjectId::new(), &sel);
        let project = pipeline[4].get_document("$project").unwrap();

        let cond = project
            .get_document("expenses")
            .unwrap()
            .get_document("$filter")
            .unwrap()
            .get_document("cond")
            .unwrap();
        let bounds = cond.get_array("$and").unwrap();
        assert_eq!(bounds.len(), 2);

        let gte = bounds[0].as_document().unwrap().get_array("$gte").unwrap();
        assert_eq!(gte[0].as_str().unwrap(), "$$expense.date");
        assert_eq!(
            gte[1].as_datetime().unwrap(),
            &bson::DateTime::from_chrono(sel.window.start)
        );

        let lt = bounds[1].as_document().unwrap().get_array("$lt").unwrap();
        assert_eq!(lt[0].as_str().unwrap(), "$$expense.date");
        assert_eq!(
            lt[1].as_datetime().unwrap(),
            &bson::DateTime::from_chrono(sel.window.end)
        );
    }

    #[test]
    fn shaping_stage_filters_members_on_the_active_flag() {
        let mut sel = selector();
        sel.active_only = false;
        let pipeline = ProjectDetailsAggregator::pipeline(ObjectId::new(), &sel);
        let cond = pipeline[4]
            .get_document("$project")
            .unwrap()
            .get_document("members")
            .unwrap()
            .get_document("$filter")
            .unwrap()
            .get_document("cond")
            .unwrap();
        let eq = cond.get_array("$eq").unwrap();
        assert_eq!(eq[0].as_str().unwrap(), "$$member.is_active");
        assert_eq!(eq[1].as_bool().unwrap(), false);
    }

    #[test]
    fn project_scalars_survive_the_shaping_stage() {
        let pipeline = ProjectDetailsAggregator::pipeline(ObjectId::new(), &selector());
        let project = pipeline[4].get_document("$project").unwrap();
        for field in ["_id", "title", "description", "created_at", "updated_at"] {
            assert_eq!(project.get_i32(field).unwrap(), 1, "missing {field}");
        }
    }
}
