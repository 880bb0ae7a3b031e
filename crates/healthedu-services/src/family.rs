//! Parent to child account links.

use healthedu_core::{
  StoreExt,
  record::{ParentChild, Profile, Role},
  store::TableStore,
};

use crate::{Error, Result};

/// Link the student registered under `child_email` to `parent_id`.
pub fn link_child<S>(store: &S, parent_id: &str, child_email: &str) -> Result<ParentChild>
where
  S: TableStore + ?Sized,
{
  let child = store
    .from::<Profile>()
    .select("id, name, role")
    .eq("email", child_email)
    .maybe_single()?
    .ok_or_else(|| Error::ChildNotFound(child_email.to_owned()))?;

  if child.role != Role::Student {
    return Err(Error::NotAStudent(child.id));
  }

  let existing = store
    .from::<ParentChild>()
    .select("*")
    .eq("parent_id", parent_id)
    .eq("child_id", child.id.as_str())
    .maybe_single()?;
  if existing.is_some() {
    return Err(Error::AlreadyLinked {
      parent_id: parent_id.to_owned(),
      child_id:  child.id,
    });
  }

  let link = store.from::<ParentChild>().insert(&ParentChild {
    id:        String::new(),
    parent_id: parent_id.to_owned(),
    child_id:  child.id,
  })?;
  tracing::info!(parent_id, child_id = %link.child_id, "child linked");
  Ok(link)
}

/// Profiles of every child linked to `parent_id`, in link order.
pub fn children<S>(store: &S, parent_id: &str) -> Result<Vec<Profile>>
where
  S: TableStore + ?Sized,
{
  let links = store
    .from::<ParentChild>()
    .select("child_id")
    .eq("parent_id", parent_id)
    .execute()?;
  if links.is_empty() {
    return Ok(Vec::new());
  }

  let students = store
    .from::<Profile>()
    .select("id, name, role, school")
    .eq("role", Role::Student.as_str())
    .execute()?;

  Ok(
    links
      .iter()
      .filter_map(|link| students.iter().find(|p| p.id == link.child_id).cloned())
      .collect(),
  )
}
