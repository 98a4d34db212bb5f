use cadsync_fs::NormalizedPath;
use cadsync_fs::checksum::{compute_content_checksum, is_checksum};
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalized_paths_never_contain_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));
        prop_assert_eq!(NormalizedPath::new(path.to_native()), path);
    }

    #[test]
    fn sibling_resolution_stays_in_project_directory(name in "[a-z]{1,8}\\.dxf") {
        let project = NormalizedPath::new("/work/site/cadsync.yaml");
        let resolved = project.resolve_sibling(&name);
        prop_assert!(resolved.as_str().starts_with("/work/site/"));
        prop_assert_eq!(resolved.file_name(), Some(name.as_str()));
    }

    #[test]
    fn checksums_are_well_formed(s in "\\PC*") {
        prop_assert!(is_checksum(&compute_content_checksum(&s)));
    }
}
