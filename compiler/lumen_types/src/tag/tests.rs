use super::*;

#[test]
fn all_tags_have_distinct_names() {
    let mut names: Vec<&str> = Tag::ALL.iter().map(|t| t.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), Tag::ALL.len());
}

#[test]
fn scalar_tags() {
    let scalars: Vec<Tag> = Tag::ALL.into_iter().filter(|t| t.is_scalar()).collect();
    assert_eq!(scalars, [Tag::Bool, Tag::I32, Tag::U32, Tag::F32]);
}
