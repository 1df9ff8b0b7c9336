//! Diesel schema for planning persistence.

diesel::table! {
    /// Employees and users.
    people (id) {
        /// Person identifier.
        id -> Int8,
        /// First name, empty when unknown.
        #[max_length = 255]
        first_name -> Varchar,
        /// Last name, empty when unknown.
        #[max_length = 255]
        last_name -> Varchar,
        /// Unique email address.
        #[max_length = 255]
        email -> Varchar,
    }
}

diesel::table! {
    /// Production tasks.
    tasks (id) {
        /// Task identifier.
        id -> Int8,
        /// Unique task name.
        #[max_length = 255]
        name -> Varchar,
        /// Free-form description.
        #[max_length = 255]
        description -> Nullable<Varchar>,
        /// Priority storage code.
        #[max_length = 32]
        priority -> Nullable<Varchar>,
        /// Status storage code.
        #[max_length = 32]
        status -> Nullable<Varchar>,
        /// Production order reference.
        #[max_length = 255]
        production_order_number -> Nullable<Varchar>,
        /// Planned window start.
        deadline_from -> Nullable<Timestamptz>,
        /// Planned window end.
        deadline_to -> Nullable<Timestamptz>,
        /// Identifier in an external system.
        outer_id -> Nullable<Int8>,
    }
}

diesel::table! {
    /// Operations within tasks.
    operations (id) {
        /// Operation identifier.
        id -> Int8,
        /// Display name.
        #[max_length = 255]
        name -> Nullable<Varchar>,
        /// Free-form description.
        #[max_length = 255]
        description -> Nullable<Varchar>,
        /// Identifier in an external system.
        outer_id -> Nullable<Int8>,
        /// Planned window start.
        deadline_from -> Nullable<Timestamptz>,
        /// Planned window end.
        deadline_to -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Operation categories.
    operation_categories (id) {
        /// Category identifier.
        id -> Int8,
        /// Display name.
        #[max_length = 255]
        name -> Nullable<Varchar>,
        /// Free-form description.
        #[max_length = 255]
        description -> Nullable<Varchar>,
        /// First operation number in the range.
        operation_number_from -> Int4,
        /// Last operation number in the range.
        operation_number_to -> Nullable<Int4>,
    }
}

diesel::table! {
    /// Work-time records, one per operation.
    work_times (id) {
        /// Work-time identifier.
        id -> Int8,
        /// Owning operation.
        operation_id -> Int8,
        /// When work started.
        start_time -> Nullable<Timestamptz>,
        /// When work ended.
        end_time -> Nullable<Timestamptz>,
        /// When the record was opened.
        creation_date -> Timestamptz,
        /// When the record was last stamped.
        updated_date -> Nullable<Timestamptz>,
        /// Deadline for the work.
        deadline -> Nullable<Timestamptz>,
        /// Free-form notes.
        #[max_length = 255]
        notes -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Person-task assignments.
    person_tasks (person_id, task_id) {
        /// Assigned person.
        person_id -> Int8,
        /// Assigned task.
        task_id -> Int8,
    }
}

diesel::table! {
    /// Task-operation membership.
    task_operations (task_id, operation_id) {
        /// Owning task.
        task_id -> Int8,
        /// Member operation.
        operation_id -> Int8,
    }
}

diesel::table! {
    /// Operation-category grouping.
    operation_operation_categories (operation_id, operation_category_id) {
        /// Grouped operation.
        operation_id -> Int8,
        /// Category.
        operation_category_id -> Int8,
    }
}
