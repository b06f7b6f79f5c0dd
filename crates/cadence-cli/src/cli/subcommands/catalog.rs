use clap::Subcommand;

/// Course catalog commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CatalogCommands {
    /// Create or update a course. A `crs-` id is generated when none is given.
    Course {
        id: Option<String>,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Create or update the task for one day of a course.
    Task {
        course_id: String,
        #[arg(long)]
        day: u32,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        exercise: Option<String>,
        #[arg(long)]
        test: Option<String>,
    },
    /// List a course's tasks, or all courses when no id is given.
    Show { course_id: Option<String> },
}
