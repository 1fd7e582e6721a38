//! Kinds of interior tree nodes.

use std::fmt;

macro_rules! node_kinds {
    ($( $(#[$meta:meta])* $variant:ident = $name:literal; )*) => {
        /// Tag of an interior node in the syntax tree.
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NodeKind {
            $( $(#[$meta])* $variant, )*
        }

        impl NodeKind {
            /// Upper-case name used in tree dumps.
            pub const fn debug_name(self) -> &'static str {
                match self {
                    $( NodeKind::$variant => $name, )*
                }
            }
        }
    };
}

node_kinds! {
    /// Placeholder for a marker that was dropped or not yet closed.
    Tombstone = "TOMBSTONE";
    Error = "ERROR_ELEMENT";

    File = "FILE";
    PackageDirective = "PACKAGE_DIRECTIVE";
    ImportList = "IMPORT_LIST";
    ImportDirective = "IMPORT_DIRECTIVE";
    ImportAlias = "IMPORT_ALIAS";
    FileAnnotationList = "FILE_ANNOTATION_LIST";

    Annotation = "ANNOTATION";
    AnnotationEntry = "ANNOTATION_ENTRY";
    AnnotationTarget = "ANNOTATION_TARGET";

    ModifierList = "MODIFIER_LIST";
    Class = "CLASS";
    ObjectDeclaration = "OBJECT_DECLARATION";
    ClassBody = "CLASS_BODY";
    PrimaryConstructor = "PRIMARY_CONSTRUCTOR";
    SecondaryConstructor = "SECONDARY_CONSTRUCTOR";
    ClassInitializer = "CLASS_INITIALIZER";
    SuperTypeList = "SUPER_TYPE_LIST";
    SuperTypeEntry = "SUPER_TYPE_ENTRY";
    SuperTypeCallEntry = "SUPER_TYPE_CALL_ENTRY";
    DelegatedSuperTypeEntry = "DELEGATED_SUPER_TYPE_ENTRY";
    ConstructorCallee = "CONSTRUCTOR_CALLEE";
    ConstructorDelegationCall = "CONSTRUCTOR_DELEGATION_CALL";
    ConstructorDelegationReference = "CONSTRUCTOR_DELEGATION_REFERENCE";
    EnumEntry = "ENUM_ENTRY";
    Fun = "FUN";
    Property = "PROPERTY";
    PropertyAccessor = "PROPERTY_ACCESSOR";
    PropertyDelegate = "PROPERTY_DELEGATE";
    TypeAlias = "TYPEALIAS";
    ValueParameterList = "VALUE_PARAMETER_LIST";
    ValueParameter = "VALUE_PARAMETER";
    TypeParameterList = "TYPE_PARAMETER_LIST";
    TypeParameter = "TYPE_PARAMETER";
    TypeConstraintList = "TYPE_CONSTRAINT_LIST";
    TypeConstraint = "TYPE_CONSTRAINT";
    DestructuringDeclaration = "DESTRUCTURING_DECLARATION";
    DestructuringDeclarationEntry = "DESTRUCTURING_DECLARATION_ENTRY";

    TypeReference = "TYPE_REFERENCE";
    UserType = "USER_TYPE";
    NullableType = "NULLABLE_TYPE";
    FunctionType = "FUNCTION_TYPE";
    FunctionTypeReceiver = "FUNCTION_TYPE_RECEIVER";
    DynamicType = "DYNAMIC_TYPE";
    TypeArgumentList = "TYPE_ARGUMENT_LIST";
    TypeProjection = "TYPE_PROJECTION";

    Block = "BLOCK";
    ReferenceExpression = "REFERENCE_EXPRESSION";
    DotQualifiedExpression = "DOT_QUALIFIED_EXPRESSION";
    SafeAccessExpression = "SAFE_ACCESS_EXPRESSION";
    CallExpression = "CALL_EXPRESSION";
    ValueArgumentList = "VALUE_ARGUMENT_LIST";
    ValueArgument = "VALUE_ARGUMENT";
    ValueArgumentName = "VALUE_ARGUMENT_NAME";
    LambdaArgument = "LAMBDA_ARGUMENT";
    LambdaExpression = "LAMBDA_EXPRESSION";
    FunctionLiteral = "FUNCTION_LITERAL";
    ArrayAccessExpression = "ARRAY_ACCESS_EXPRESSION";
    Indices = "INDICES";
    BinaryExpression = "BINARY_EXPRESSION";
    BinaryWithType = "BINARY_WITH_TYPE";
    IsExpression = "IS_EXPRESSION";
    PrefixExpression = "PREFIX_EXPRESSION";
    PostfixExpression = "POSTFIX_EXPRESSION";
    OperationReference = "OPERATION_REFERENCE";
    Parenthesized = "PARENTHESIZED";
    AnnotatedExpression = "ANNOTATED_EXPRESSION";
    LabeledExpression = "LABELED_EXPRESSION";
    LabelQualifier = "LABEL_QUALIFIER";
    Label = "LABEL";
    StringTemplate = "STRING_TEMPLATE";
    LiteralStringTemplateEntry = "LITERAL_STRING_TEMPLATE_ENTRY";
    ShortStringTemplateEntry = "SHORT_STRING_TEMPLATE_ENTRY";
    EscapeStringTemplateEntry = "ESCAPE_STRING_TEMPLATE_ENTRY";
    LongStringTemplateEntry = "LONG_STRING_TEMPLATE_ENTRY";
    IntegerConstant = "INTEGER_CONSTANT";
    FloatConstant = "FLOAT_CONSTANT";
    CharacterConstant = "CHARACTER_CONSTANT";
    BooleanConstant = "BOOLEAN_CONSTANT";
    Null = "NULL";
    ThisExpression = "THIS_EXPRESSION";
    SuperExpression = "SUPER_EXPRESSION";
    CallableReferenceExpression = "CALLABLE_REFERENCE_EXPRESSION";
    ClassLiteralExpression = "CLASS_LITERAL_EXPRESSION";
    CollectionLiteralExpression = "COLLECTION_LITERAL_EXPRESSION";
    ObjectLiteral = "OBJECT_LITERAL";
    If = "IF";
    Condition = "CONDITION";
    Then = "THEN";
    Else = "ELSE";
    When = "WHEN";
    WhenEntry = "WHEN_ENTRY";
    WhenConditionExpression = "WHEN_CONDITION_EXPRESSION";
    WhenConditionInRange = "WHEN_CONDITION_IN_RANGE";
    WhenConditionIsPattern = "WHEN_CONDITION_IS_PATTERN";
    Try = "TRY";
    Catch = "CATCH";
    Finally = "FINALLY";
    For = "FOR";
    LoopRange = "LOOP_RANGE";
    Body = "BODY";
    While = "WHILE";
    DoWhile = "DO_WHILE";
    Return = "RETURN";
    Throw = "THROW";
    Break = "BREAK";
    Continue = "CONTINUE";

    KDoc = "KDOC";
    KDocSection = "KDOC_SECTION";
    KDocTag = "KDOC_TAG";
    KDocLink = "KDOC_LINK";
    KDocName = "KDOC_NAME";
}

impl NodeKind {
    /// Receiver-dot-selector shapes.
    #[inline]
    pub fn is_qualified_access(self) -> bool {
        matches!(
            self,
            NodeKind::DotQualifiedExpression | NodeKind::SafeAccessExpression
        )
    }

    /// Declarations that can carry a preceding doc comment.
    pub fn is_declaration(self) -> bool {
        matches!(
            self,
            NodeKind::Class
                | NodeKind::ObjectDeclaration
                | NodeKind::Fun
                | NodeKind::Property
                | NodeKind::TypeAlias
                | NodeKind::SecondaryConstructor
                | NodeKind::ClassInitializer
                | NodeKind::EnumEntry
                | NodeKind::PropertyAccessor
                | NodeKind::DestructuringDeclaration
        )
    }
}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.debug_name())
    }
}
