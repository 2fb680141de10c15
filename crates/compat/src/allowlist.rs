/// Op type names currently valid on the TPU.
///
/// This list encodes real accelerator support data; entries must match the
/// op names reported by the runtime exactly (case-sensitive).
pub static TPU_ALLOWED_OPS: &[&str] = &[
    "Abs",
    "Add",
    "AddN",
    "All",
    "Any",
    "Assert",
    "AssignAddVariableOp",
    "AssignSubVariableOp",
    "AssignVariableOp",
    "AvgPool",
    "AvgPool3D",
    "AvgPool3DGrad",
    "AvgPoolGrad",
    "BatchMatMul",
    "BatchToSpace",
    "BatchToSpaceND",
    "BiasAdd",
    "BiasAddGrad",
    "BiasAddV1",
    "BroadcastGradientArgs",
    "Cast",
    "Ceil",
    "CheckNumerics",
    "Concat",
    "ConcatOffset",
    "ConcatV2",
    "Const",
    "ControlTrigger",
    "Conv2D",
    "Conv2DBackpropFilter",
    "Conv2DBackpropInput",
    "Conv3D",
    "Conv3DBackpropFilterV2",
    "Conv3DBackpropInputV2",
    "Cos",
    "Cross",
    "CrossReplicaSum",
    "DepthwiseConv2dNative",
    "DepthwiseConv2dNativeBackpropFilter",
    "DepthwiseConv2dNativeBackpropInput",
    "Diag",
    "DiagPart",
    "Div",
    "DynamicStitch",
    "Elu",
    "EluGrad",
    "Empty",
    "Equal",
    "Exp",
    "ExpandDims",
    "Fill",
    "Floor",
    "FloorDiv",
    "FloorMod",
    "FusedBatchNorm",
    "FusedBatchNormGrad",
    "Gather",
    "Greater",
    "GreaterEqual",
    "Identity",
    "InfeedDequeue",
    "InfeedDequeueTuple",
    "InplaceAdd",
    "InplaceUpdate",
    "Inv",
    "InvertPermutation",
    "IsFinite",
    "L2Loss",
    "Less",
    "LessEqual",
    "LinSpace",
    "Log",
    "Log1p",
    "LogicalAnd",
    "LogicalNot",
    "LogicalOr",
    "LogSoftmax",
    "LRN",
    "LRNGrad",
    "MatMul",
    "MatrixDiag",
    "MatrixDiagPart",
    "Max",
    "Maximum",
    "MaxPool",
    "MaxPool3D",
    "MaxPool3DGrad",
    "MaxPoolGrad",
    "Mean",
    "Min",
    "Minimum",
    "MirrorPad",
    "Mod",
    "Mul",
    "Neg",
    "NoOp",
    "NotEqual",
    "OneHot",
    "OnesLike",
    "OutfeedEnqueue",
    "OutfeedEnqueueTuple",
    "Pack",
    "Pad",
    "PadV2",
    "Pow",
    "PreventGradient",
    "Prod",
    "RandomStandardNormal",
    "RandomUniform",
    "RandomUniformInt",
    "Range",
    "Rank",
    "ReadVariableOp",
    "RealDiv",
    "Reciprocal",
    "RecvBarnaCoreActivations",
    "Relu",
    "Relu6",
    "Relu6Grad",
    "ReluGrad",
    "Reshape",
    "ResourceApplyAdagrad",
    "ResourceApplyAdam",
    "ResourceApplyFtrl",
    "ResourceApplyFtrlV2",
    "ResourceApplyGradientDescent",
    "ResourceApplyMomentum",
    "ResourceApplyRMSProp",
    "ResourceGather",
    "ResourceStridedSliceAssign",
    "Reverse",
    "ReverseV2",
    "Round",
    "Rsqrt",
    "RsqrtGrad",
    "Select",
    "Selu",
    "SeluGrad",
    "SendBarnaCoreGradients",
    "Shape",
    "ShapeN",
    "Sigmoid",
    "SigmoidGrad",
    "Sign",
    "Sin",
    "Size",
    "Slice",
    "Softmax",
    "SoftmaxCrossEntropyWithLogits",
    "Softplus",
    "SoftplusGrad",
    "SpaceToBatch",
    "SpaceToBatchND",
    "SparseMatMul",
    "SparseSoftmaxCrossEntropyWithLogits",
    "Split",
    "SplitV",
    "Sqrt",
    "Square",
    "SquaredDifference",
    "Squeeze",
    "StackCloseV2",
    "StackPopV2",
    "StackPushV2",
    "StackV2",
    "StopGradient",
    "StridedSlice",
    "StridedSliceGrad",
    "Sub",
    "Sum",
    "SymbolicGradient",
    "Tanh",
    "TanhGrad",
    "TensorArrayCloseV3",
    "TensorArrayConcatV3",
    "TensorArrayGatherV3",
    "TensorArrayGradV3",
    "TensorArrayReadV3",
    "TensorArrayScatterV3",
    "TensorArraySizeV3",
    "TensorArraySplitV3",
    "TensorArrayV3",
    "TensorArrayWriteV3",
    "Tile",
    "Transpose",
    "TruncateDiv",
    "TruncatedNormal",
    "TruncateMod",
    "Unpack",
    "UnsortedSegmentSum",
    "VarIsInitializedOp",
    "While",
    "XlaWhile",
    "ZerosLike",
];

/// Exact-match membership test against the allow-list. Case-sensitive;
/// no wildcards or prefix matching.
pub fn is_allowed(op: &str) -> bool {
    TPU_ALLOWED_OPS.iter().any(|a| *a == op)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_ops_listed() {
        for op in ["Add", "MatMul", "Conv2D", "Relu", "While"] {
            assert!(is_allowed(op), "{op} should be allowed");
        }
    }

    #[test]
    fn match_is_case_sensitive() {
        assert!(is_allowed("Add"));
        assert!(!is_allowed("add"));
        assert!(!is_allowed("ADD"));
    }

    #[test]
    fn no_prefix_matching() {
        assert!(is_allowed("Conv2D"));
        assert!(!is_allowed("Conv2"));
        assert!(!is_allowed("Conv2DX"));
    }

    #[test]
    fn unknown_op_rejected() {
        assert!(!is_allowed("FooBar"));
        assert!(!is_allowed(""));
    }

    #[test]
    fn no_duplicate_entries() {
        let mut seen = std::collections::HashSet::new();
        for op in TPU_ALLOWED_OPS {
            assert!(seen.insert(*op), "duplicate entry {op}");
        }
    }
}
