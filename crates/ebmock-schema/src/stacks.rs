//! Catalog of solution stacks accepted by `createEnvironment`.

pub const SOLUTION_STACKS: &[&str] = &[
    "32bit Amazon Linux running PHP 5.3",
    "64bit Amazon Linux running PHP 5.3",
    "32bit Amazon Linux 2014.03 v1.0.3 running PHP 5.4",
    "64bit Amazon Linux 2014.03 v1.0.3 running PHP 5.4",
    "32bit Amazon Linux 2014.03 v1.0.3 running PHP 5.5",
    "64bit Amazon Linux 2014.03 v1.0.3 running PHP 5.5",
    "32bit Amazon Linux running Node.js",
    "64bit Amazon Linux running Node.js",
    "32bit Amazon Linux 2014.03 v1.0.2 running Node.js",
    "64bit Amazon Linux 2014.03 v1.0.2 running Node.js",
    "32bit Amazon Linux running Python",
    "64bit Amazon Linux running Python",
    "32bit Amazon Linux 2014.03 v1.0.2 running Python 2.7",
    "64bit Amazon Linux 2014.03 v1.0.2 running Python 2.7",
    "32bit Amazon Linux running Ruby 1.8.7",
    "64bit Amazon Linux running Ruby 1.8.7",
    "32bit Amazon Linux running Ruby 1.9.3",
    "64bit Amazon Linux running Ruby 1.9.3",
    "64bit Amazon Linux 2014.03 v1.0.3 running Ruby 2.0 (Passenger Standalone)",
    "64bit Amazon Linux 2014.03 v1.0.3 running Ruby 2.0 (Puma)",
    "32bit Amazon Linux running Tomcat 6",
    "64bit Amazon Linux running Tomcat 6",
    "32bit Amazon Linux running Tomcat 7",
    "64bit Amazon Linux running Tomcat 7",
    "64bit Amazon Linux 2014.03 v1.0.3 running Tomcat 7 Java 7",
    "64bit Amazon Linux 2014.03 v1.0.3 running Tomcat 7 Java 6",
    "64bit Windows Server 2008 R2 running IIS 7.5",
    "64bit Windows Server 2012 running IIS 8",
    "64bit Windows Server 2012 R2 running IIS 8.5",
    "64bit Amazon Linux 2014.03 v1.0.0 running Docker 0.9.0",
    "64bit Amazon Linux 2014.03 v1.0.2 running Docker 1.0.0",
];

pub fn is_known_solution_stack(name: &str) -> bool {
    SOLUTION_STACKS.contains(&name)
}

pub fn list_solution_stacks() -> &'static [&'static str] {
    SOLUTION_STACKS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_stack_is_recognized() {
        assert!(is_known_solution_stack("32bit Amazon Linux running PHP 5.3"));
        assert!(!is_known_solution_stack("whooohoo"));
    }

    #[test]
    fn lookup_is_exact() {
        assert!(!is_known_solution_stack("32bit amazon linux running php 5.3"));
        assert!(!is_known_solution_stack(" 32bit Amazon Linux running PHP 5.3"));
    }

    #[test]
    fn all_stacks_are_unique() {
        let mut names: Vec<&str> = SOLUTION_STACKS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SOLUTION_STACKS.len());
    }
}
